//! Config command handler.

use crate::config::{config_path, init_config, load_config_from};
use crate::error::Result;
use crate::output::{print_config, print_config_created};

/// Display the effective configuration, optionally creating the file first.
pub fn config_command(init: bool) -> Result<()> {
    if init {
        let (path, created) = init_config()?;
        if created {
            print_config_created(&path);
        }
    }

    let path = config_path()?;
    let config = load_config_from(&path)?;
    print_config(&path, path.exists(), &config);
    Ok(())
}
