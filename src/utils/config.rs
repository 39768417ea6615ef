#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use log::{info, error, LevelFilter};
use serde::Deserialize;
use std::{env, fs, path::Path};
use toml;

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root, Config as Log4rsConfig};
use log4rs::encode::pattern::PatternEncoder;

// Server Utilities
use crate::utils::errors::Errors;
use crate::utils::srv_utils::get_absolute_path;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// File locations.  Relative paths are resolved against the server's working
// directory; both files are optional and the server runs without them.
const ENV_CONFIG_FILE      : &str = "FRIENDS_CONFIG";
const DEFAULT_CONFIG_FILE  : &str = "./friends.toml";
const LOG4RS_CONFIG_FILE   : &str = "./log4rs.yml";

// Netorking.
const DEFAULT_HTTP_ADDR    : &str = "127.0.0.1";
const DEFAULT_HTTP_PORT    : u16  = 3000;

// Static assets.
const DEFAULT_PUBLIC_DIR   : &str = "./public";

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// Parms:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct Parms {
    pub config_file: String,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
pub struct RuntimeCtx {
    pub parms: Parms,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
// Fields missing from the configuration file take their default values.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub http_addr: String,
    pub http_port: u16,
    pub public_dir: String,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Friends Server".to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            public_dir: DEFAULT_PUBLIC_DIR.to_string(),
        }
    }
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs from the optional configuration file.  When the file
 * is absent the builtin console configuration is used instead, so a bare
 * checkout runs without any setup.
 */
pub fn init_log() {
    // Initialize log4rs logging.
    let logconfig = LOG4RS_CONFIG_FILE.to_string();
    if Path::new(&logconfig).is_file() {
        match log4rs::init_file(logconfig.clone(), Default::default()) {
            Ok(_) => (),
            Err(e) => {
                println!("{}", e);
                let s = format!("{}", Errors::Log4rsInitialization(logconfig));
                panic!("{}", s);
            },
        }
        info!("Log4rs initialized using: {}", logconfig);
    } else {
        init_console_log();
        info!("Log4rs initialized using the builtin console configuration.");
    }
}

// ---------------------------------------------------------------------------
// init_console_log:
// ---------------------------------------------------------------------------
fn init_console_log() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = match Log4rsConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info)) {
            Ok(c) => c,
            Err(e) => {
                panic!("{}", Errors::Log4rsInitialization(e.to_string()));
            },
        };
    if let Err(e) = log4rs::init_config(config) {
        panic!("{}", Errors::Log4rsInitialization(e.to_string()));
    }
}

// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_parms:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the configuration file specified
 * either through an environment variable or at the default file path.  If
 * the file cannot be read, the compiled-in defaults are used.
 */
fn get_parms() -> Result<Parms> {
    // Get the config file path from the environment or use the default.
    let config_file = env::var(ENV_CONFIG_FILE).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    // Read the cofiguration file.
    let config_file_abs = get_absolute_path(&config_file);
    info!("{}", Errors::ReadingConfigFile(config_file_abs.clone()));
    let contents = match fs::read_to_string(&config_file_abs) {
        Ok(c) => c,
        Err(_) => {
            println!("Unable to read configuration at {}. Using default values.", config_file);
            return Ok(Parms { config_file: Default::default(), config: Config::new() });
        }
    };

    // Parse the toml configuration.
    let config : Config = match toml::from_str(&contents) {
        Ok(c)  => c,
        Err(e) => {
            let msg = format!("{}\n   {}", Errors::TOMLParseError(config_file_abs), e);
            error!("{}", msg);
            return Result::Err(anyhow!(msg));
        }
    };

    Ok(Parms { config_file: config_file_abs, config })
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
pub fn init_runtime_context() -> RuntimeCtx {
    // If this fails the application aborts.
    let parms = get_parms().expect("FAILED to read configuration file.");
    RuntimeCtx {parms}
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use crate::utils::config::Config;

    #[test]
    fn print_config() {
        println!("{:?}", Config::new());
    }

    #[test]
    fn default_config_targets_localhost() {
        let config = Config::new();
        assert_eq!(config.http_addr, "127.0.0.1");
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.public_dir, "./public");
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config: Config = toml::from_str("http_port = 4000").unwrap();
        assert_eq!(config.http_port, 4000);
        assert_eq!(config.http_addr, "127.0.0.1");
        assert_eq!(config.title, "Friends Server");
    }
}
