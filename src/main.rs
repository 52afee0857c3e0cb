/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! `t2t`: drives the translators from the command line.
//!
//! Credentials are read from the config file or from `T2T_<VENDOR>_<KEY>`
//! environment variables, e.g. `T2T_WINK_ACCESS_TOKEN`.

use clap::{ Parser, Subcommand };
use log::{ debug, info };
use serde::Serialize;
use serde_json::{ json, Value };
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use translators::adapters::hue::discovery;
use translators::adapters::Vendor;
use translators::config::ConfigStore;
use translators::verify::{ self, Severity };
use translators::{ Error, Result };
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "t2t", version, about = "Smart-home vendor translators")]
struct Cli {
    /// Configuration file holding vendor credentials and settings
    #[arg(long, global = true, default_value = "t2t.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Philips Hue bridges on the local network
    Hue {
        #[command(subcommand)]
        action: HueAction,
    },
    /// Wink cloud account
    Wink {
        #[command(subcommand)]
        action: HubAction,
    },
    /// Nest cloud account
    Nest {
        #[command(subcommand)]
        action: HubAction,
    },
    /// SmartThings account, through the OpenT2T SmartApp
    Smartthings {
        #[command(subcommand)]
        action: HubAction,
    },
    /// Insteon cloud account
    Insteon {
        #[command(subcommand)]
        action: HubAction,
    },
    /// Vera controller, on the LAN or through remote access
    Vera {
        #[command(subcommand)]
        action: HubAction,
    },
    /// ContosoThings cloud account
    Contosothings {
        #[command(subcommand)]
        action: HubAction,
    },
    /// Check every translator manifest against naming rules and its schema
    Verify,
}

#[derive(Subcommand, Debug)]
enum HueAction {
    /// List bridges registered with the nUPnP discovery service
    Discover,
    /// Pair with a bridge; press its link button first
    Pair {
        /// Bridge IP address
        ip: String,
        /// Bridge id (defaults to the IP address)
        #[arg(long)]
        id: Option<String>,
        #[arg(long, default_value_t = 30)]
        attempts: u32,
        /// Seconds between attempts
        #[arg(long, default_value_t = 1)]
        interval: u64,
    },
    #[command(flatten)]
    Hub(HubAction),
}

#[derive(Subcommand, Debug)]
enum HubAction {
    /// List every supported device of the account
    Platforms {
        /// Include resource values
        #[arg(long)]
        expand: bool,
    },
    /// Read one device
    Get {
        id: String,
    },
    /// Write one resource, e.g. `set 12 power '{"value": true}'`
    Set {
        id: String,
        resource: String,
        json: String,
    },
    /// Register a callback URL for device notifications
    Subscribe {
        id: String,
        callback: String,
        /// Shared secret for signing notifications (random if omitted)
        #[arg(long)]
        secret: Option<String>,
    },
    /// Remove a notification subscription
    Unsubscribe {
        id: String,
        subscription: String,
    },
    /// Translate a notification payload read from a file, or `-` for stdin
    Translate {
        file: String,
    },
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_payload(file: &str) -> Result<Value> {
    let content = if file == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(file)?
    };
    serde_json::from_str(&content).map_err(|e| Error::BadRequest(format!("{} is not JSON: {}", file, e)))
}

async fn run_hub(vendor: Vendor, action: HubAction, config: &ConfigStore) -> Result<()> {
    let hub = vendor.open_hub(config)?;
    debug!("Opened {} hub translator {}", vendor, hub.manifest().name);
    match action {
        HubAction::Platforms { expand } => print(&hub.get_platforms(expand).await?),
        HubAction::Get { id } => print(&hub.get_platform(&id, true).await?),
        HubAction::Set { id, resource, json } => {
            let payload: Value = serde_json::from_str(&json)
                .map_err(|e| Error::BadRequest(format!("resource value is not JSON: {}", e)))?;
            print(&hub.post_resource(&id, &resource, &payload).await?)
        },
        HubAction::Subscribe { id, callback, secret } => {
            let secret = secret.unwrap_or_else(|| Uuid::new_v4().simple().to_string());
            let subscription = hub.subscribe(&id, &callback, Some(&secret)).await?;
            print(&json!({ "subscription": subscription, "secret": secret }))
        },
        HubAction::Unsubscribe { id, subscription } => {
            hub.unsubscribe(&id, &subscription).await?;
            info!("Removed subscription {}", subscription);
            Ok(())
        },
        HubAction::Translate { file } => print(&hub.translate_notification(&read_payload(&file)?)?),
    }
}

async fn run_hue(action: HueAction, config: &ConfigStore) -> Result<()> {
    match action {
        HueAction::Discover => print(&discovery::nupnp_query(config).await),
        HueAction::Pair { ip, id, attempts, interval } => {
            let id = id.unwrap_or_else(|| ip.clone());
            discovery::pair(&id, &ip, config, attempts, Duration::from_secs(interval)).await?;
            config.set("hue", "bridge_ip", &ip)?;
            config.set("hue", "bridge_id", &id)?;
            print(&json!({ "bridge_id": id, "bridge_ip": ip }))
        },
        HueAction::Hub(action) => run_hub(Vendor::Hue, action, config).await,
    }
}

/// Exit code 1 when any check fails.
fn run_verify() -> i32 {
    let findings = verify::verify_all();
    for finding in &findings {
        eprintln!("{}", finding);
    }
    let failed = findings.iter().any(|f| f.severity == Severity::Error);
    if failed { 1 } else { 0 }
}

async fn run(cli: Cli) -> Result<i32> {
    let config = ConfigStore::open(&cli.config)?;
    match cli.command {
        Command::Hue { action } => run_hue(action, &config).await?,
        Command::Wink { action } => run_hub(Vendor::Wink, action, &config).await?,
        Command::Nest { action } => run_hub(Vendor::Nest, action, &config).await?,
        Command::Smartthings { action } => run_hub(Vendor::SmartThings, action, &config).await?,
        Command::Insteon { action } => run_hub(Vendor::Insteon, action, &config).await?,
        Command::Vera { action } => run_hub(Vendor::Vera, action, &config).await?,
        Command::Contosothings { action } => run_hub(Vendor::ContosoThings, action, &config).await?,
        Command::Verify => return Ok(run_verify()),
    }
    Ok(0)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("t2t: {} (status {})", e, e.status());
            process::exit(1);
        }
    }
}
