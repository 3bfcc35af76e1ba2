use std::env;
use std::path::PathBuf;

use localblog::config::{read_config, Config};

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];

    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(|d| d.to_path_buf())) {
        candidates.push(exe_dir.join(CFG_FILE_NAME));
    }
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join(CFG_FILE_NAME));
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Reads the configuration. An explicit posts folder wins over the file, and
/// makes the file optional.
pub(crate) fn open_config(cfg_path: Option<PathBuf>, folder: Option<PathBuf>) -> Result<Config, String> {
    let config_path = cfg_path.or_else(get_config_path);

    let mut config = match (config_path, folder.as_ref()) {
        (Some(path), _) => {
            println!("Reading config from {}", path.display());
            read_config(&path).map_err(|e| e.to_string())?
        }
        (None, Some(folder)) => Config::for_folder(folder.clone()),
        (None, None) => return Err("Could not find localblog configuration".to_string()),
    };

    if let Some(folder) = folder {
        config.paths.posts_dir = folder;
    }

    if let Some(ref mut log) = config.log {
        if log.location.is_none() {
            log.location = dirs::cache_dir().map(|dir| dir.join("localblog").join("log").join("localblog.log"));
        }
        if let Some(ref location) = log.location {
            println!("Log enabled. Files will be written in {}", location.display());
        }
    }

    Ok(config)
}
