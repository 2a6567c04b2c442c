//! Frameworks command implementation
//!
//! Lists the frameworks the analyze command can score.

use crate::analysis::FrameworkRegistry;
use crate::config::load_config_or_default;
use clap::Args;
use std::sync::Arc;

/// Arguments for the frameworks command
#[derive(Args, Debug)]
pub struct FrameworksArgs {
    /// Also print every keyword
    #[arg(long)]
    pub keywords: bool,
}

impl FrameworksArgs {
    /// Execute the frameworks command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let registry = match &config.analysis.framework_library {
            Some(path) => match FrameworkRegistry::from_file(path) {
                Ok(registry) => Arc::new(registry),
                Err(e) => {
                    eprintln!("❌ {e:#}");
                    return Ok(2);
                }
            },
            None => FrameworkRegistry::builtin(),
        };

        print!("{}", self.render(&registry));
        Ok(0)
    }

    fn render(&self, registry: &FrameworkRegistry) -> String {
        let mut output = String::new();
        output.push_str(&format!("📋 {} registered frameworks\n\n", registry.len()));
        output.push_str(&format!("  {:10} {:>8}   {}\n", "ID", "KEYWORDS", "DESCRIPTION"));

        for framework in registry.iter() {
            output.push_str(&format!(
                "  {:10} {:>8}   {}\n",
                framework.id,
                framework.keywords.len(),
                framework.description
            ));
            if self.keywords {
                output.push_str(&format!("             {}\n", framework.keywords.join(", ")));
            }
        }

        output
    }
}
