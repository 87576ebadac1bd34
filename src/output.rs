use std::io::{self, Write};

use crate::app::{ProgressEvent, ProgressSink, RunReport};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_report(report: &RunReport) -> io::Result<()> {
        let json = serde_json::to_string_pretty(report)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

pub struct TextOutput;

impl ProgressSink for TextOutput {
    fn event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Message(message) => println!("{message}"),
            ProgressEvent::Bytes { done, total } => {
                match total {
                    Some(total) if total > 0 => {
                        let percent = done * 100 / total;
                        print!(
                            "\r  {percent}% ({} KB / {} KB)",
                            done / 1024,
                            total / 1024
                        );
                    }
                    _ => print!("\r  {} KB", done / 1024),
                }
                let _ = io::stdout().flush();
                if total == Some(done) {
                    println!();
                }
            }
        }
    }
}
