#![cfg(feature = "cli")]

use std::error::Error;
use std::process;

use clap::Parser;
use log::{debug, error};

use bgpstream_core::datasource::{
    DataInterfaceConfig, DataInterfaceId, DataInterfaceOption,
    DataSourceManager, DataSourceStatus,
};
use bgpstream_core::filter::FilterManager;
use bgpstream_core::input::InputQueue;
use bgpstream_core::resource::RecordDumpType;

/// Polls a data interface and prints the resources it discovers.
#[derive(Parser, Debug)]
#[command(name = "ds-poll", version)]
struct Args {
    /// Data interface to use
    #[arg(short = 'd', long, default_value = "broker")]
    data_interface: String,

    /// Data interface option, as name=value (repeatable)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    options: Vec<String>,

    /// JSON file with options for all data interfaces
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Only resources of this project (repeatable)
    #[arg(short = 'p', long = "project")]
    projects: Vec<String>,

    /// Only resources of this collector (repeatable)
    #[arg(short = 'C', long = "collector")]
    collectors: Vec<String>,

    /// Only resources of this type, ribs or updates (repeatable)
    #[arg(short = 't', long = "type")]
    record_types: Vec<RecordDumpType>,

    /// Time interval as begin,end; leave out end for live mode (repeatable)
    #[arg(short = 'w', long = "interval", value_name = "BEGIN,END")]
    intervals: Vec<String>,

    /// Wait until something new shows up
    #[arg(short, long)]
    blocking: bool,

    /// Number of polls before exiting
    #[arg(short = 'n', long, default_value_t = 1)]
    polls: usize,

    /// Print resources as JSON lines
    #[arg(long)]
    json: bool,

    /// List the data interfaces and their options, then exit
    #[arg(short, long)]
    list: bool,
}

fn list_data_interfaces(config: &DataInterfaceConfig) {
    for id in DataInterfaceId::ALL {
        let info = id.info();
        println!("{}: {}", info.name, info.description);
        for option in id.options() {
            println!("    {:<12} {}", option.name(), option.description());
        }
    }
    debug!("current config: {:?}", config);
}

fn parse_interval(
    interval: &str,
) -> Result<(u32, Option<u32>), Box<dyn Error>> {
    let (begin, end) = interval.split_once(',').unwrap_or((interval, ""));
    let begin = begin.trim().parse()?;
    let end = match end.trim() {
        "" => None,
        end => Some(end.parse()?),
    };
    Ok((begin, end))
}

fn build_filter(args: &Args) -> Result<FilterManager, Box<dyn Error>> {
    let mut filter = FilterManager::new();
    for project in &args.projects {
        filter.add_project(project.as_str());
    }
    for collector in &args.collectors {
        filter.add_collector(collector.as_str());
    }
    for record_type in &args.record_types {
        filter.add_record_type(*record_type);
    }
    for interval in &args.intervals {
        let (begin, end) = parse_interval(interval)?;
        filter.add_interval(begin, end);
    }
    Ok(filter)
}

fn build_manager(args: &Args) -> Result<DataSourceManager, Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => {
            DataInterfaceConfig::from_json(&std::fs::read_to_string(path)?)?
        }
        None => DataInterfaceConfig::default(),
    };
    let mut mgr = DataSourceManager::new().with_config(config);
    let id: DataInterfaceId = args.data_interface.parse()?;
    mgr.set_data_interface(id);

    for option in &args.options {
        let (name, value) = option
            .split_once('=')
            .ok_or_else(|| format!("option '{}' is not name=value", option))?;
        let option = DataInterfaceOption::find(id, name)?;
        mgr.set_data_interface_option(option, value)?;
    }
    if args.blocking {
        mgr.set_blocking();
    }
    Ok(mgr)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.list {
        list_data_interfaces(&DataInterfaceConfig::default());
        return Ok(());
    }

    let filter = build_filter(&args)?;
    let mut mgr = build_manager(&args)?;
    mgr.init(&filter);
    if mgr.status() != DataSourceStatus::On {
        return Err(format!(
            "data interface {} is {}",
            mgr.data_interface(),
            mgr.status()
        )
        .into());
    }

    let mut queue = InputQueue::new();
    for _ in 0..args.polls {
        let found = mgr.update_input_queue(&mut queue)?;
        debug!("poll found {} resources", found);
        while let Some(resource) = queue.pop() {
            if args.json {
                println!("{}", serde_json::to_string(&resource)?);
            } else {
                println!("{}", resource);
            }
        }
    }
    mgr.close();
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Args::parse()) {
        error!("{}", err);
        eprintln!("ds-poll: {}", err);
        process::exit(1);
    }
}
