//! Path command for locating the active partition file.

use std::io::Write;

use anyhow::Result;
use chrono::Local;
use hooklog_core::{EventLogger, partition};

use crate::Config;

/// Prints the partition file an event logged now would be appended to.
pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let logger = EventLogger::new(&config.project_root);
    let path = partition::partition_path(logger.log_dir(), &Local::now());
    writeln!(writer, "{}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn prints_current_month_partition() {
        let config = Config {
            project_root: PathBuf::from("/srv/app"),
            project_description: None,
        };

        let mut output = Vec::new();
        run(&mut output, &config).unwrap();
        let output = String::from_utf8(output).unwrap();

        let expected = format!(
            "/srv/app/.claude/logs/sessions-{}.log",
            Local::now().format("%Y-%m")
        );
        assert_eq!(
            output.trim_end(),
            PathBuf::from(expected).display().to_string()
        );
    }
}
