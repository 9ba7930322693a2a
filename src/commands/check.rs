//! Check command implementation.
//!
//! Validates procfs access and configuration.

use herakles_top::process::{collect_proc_entries, read_proc_stat, read_uid};
use herakles_top::system::{read_cpu_stat, read_meminfo, read_uptime};

use crate::config::{validate_effective_config, Config};

/// Validates system requirements and configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 herakles-top - System Check");
    println!("==============================");

    let root = config.proc_root();
    let mut all_ok = true;

    println!("\n📁 Checking {} ...", root.display());
    if root.is_dir() {
        println!("   ✅ procfs root accessible");
    } else {
        println!("   ❌ {} not found", root.display());
        all_ok = false;
    }

    println!("\n🖥️  Checking global counters...");
    match read_cpu_stat(&root) {
        Ok(cpu) => println!(
            "   ✅ stat: {} total ticks, {} idle",
            cpu.total(),
            cpu.idle_total()
        ),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }
    match read_meminfo(&root) {
        Ok(mem) => println!(
            "   ✅ meminfo: total {} MB, available {} MB",
            mem.total_kb / 1024,
            mem.available_kb / 1024
        ),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }
    match read_uptime(&root) {
        Ok(secs) => println!("   ✅ uptime: {:.0}s", secs),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Checking process records...");
    let entries = collect_proc_entries(&root, Some(5));
    if entries.is_empty() {
        println!("   ❌ Cannot read any process entries");
        all_ok = false;
    } else {
        let readable = entries
            .iter()
            .filter(|e| read_proc_stat(&e.proc_path).is_ok())
            .count();
        let owned = entries
            .iter()
            .filter(|e| read_uid(&e.proc_path).is_ok())
            .count();
        println!(
            "   ✅ {} of {} sampled processes readable, {} with owner",
            readable,
            entries.len(),
            owned
        );
        if readable == 0 {
            all_ok = false;
        }
    }

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
