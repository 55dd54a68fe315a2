use sysinfo::System;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SystemSnapshot {
    pub system: String,
    pub platform: String,
    pub machine: String,
    pub processor: String,
    pub cpu_percent: f32,
    pub memory_used: u64,
    pub memory_total: u64,
    pub boot_time: u64,
}

impl SystemSnapshot {
    /// Refreshes `sys` and reads it. CPU usage is measured since the
    /// previous refresh of the same `System`.
    pub fn capture(sys: &mut System) -> Self {
        sys.refresh_cpu();
        sys.refresh_memory();

        SystemSnapshot {
            system: System::name().unwrap_or_else(|| "Unknown".to_string()),
            platform: System::long_os_version().unwrap_or_else(|| "Unknown".to_string()),
            machine: System::cpu_arch().unwrap_or_else(|| "Unknown".to_string()),
            processor: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .filter(|brand| !brand.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_percent: sys.global_cpu_info().cpu_usage(),
            memory_used: sys.used_memory(),
            memory_total: sys.total_memory(),
            boot_time: System::boot_time(),
        }
    }

    pub fn cpu(&self) -> String {
        format!("{:.1}%", self.cpu_percent)
    }

    pub fn memory(&self) -> String {
        format!(
            "{:.1}/{:.1}GiB",
            self.memory_used as f64 / GIB,
            self.memory_total as f64 / GIB
        )
    }
}
