//! Controller statistics collection and reporting.
//!
//! This module tracks performance metrics for the memory controller. It provides:
//! 1. **Time:** Simulated cycles, cycles skipped while idle, and host run time.
//! 2. **Requests:** Admissions, retirements, backpressure and request latency.
//! 3. **Row buffer:** Hit and miss counts at dispatch.
//! 4. **Commands:** Counts of every command type put on the bus.
//! 5. **Output:** Bus cycles lost to refresh, bank-to-bus wait of RD/WR, starved
//!    QoS dispatch holds.

use std::time::Instant;

/// Controller statistics.
#[derive(Clone, Debug)]
pub struct ControllerStats {
    start_time: Instant,
    /// Controller cycles simulated one by one.
    pub cycles: u64,
    /// Controller cycles jumped over while the queue was empty.
    pub skipped_cycles: u64,

    /// Requests admitted into the queue.
    pub requests_admitted: u64,
    /// Requests retired by emission of their RD/WR.
    pub requests_retired: u64,
    /// Cycles in which an offered request was refused.
    pub backpressure_rejections: u64,
    /// Cycles in which the queue was full at the end of admission.
    pub queue_full_cycles: u64,
    /// Sum of admission-to-retirement latencies.
    pub total_latency: u64,
    /// Largest admission-to-retirement latency.
    pub max_latency: u64,

    /// Dispatches that found their row open.
    pub row_hits: u64,
    /// Dispatches that had to precharge and activate.
    pub row_misses: u64,

    /// RD commands emitted.
    pub reads: u64,
    /// WR commands emitted.
    pub writes: u64,
    /// ACT commands issued.
    pub activates: u64,
    /// PRE commands issued.
    pub precharges: u64,
    /// REF commands issued.
    pub refreshes: u64,

    /// Bus cycles in which a ready command was held back by refresh.
    pub suppressed_output_ticks: u64,
    /// Sum of cycles RD/WR spent in the output buffer before emission.
    pub bus_wait_total: u64,
    /// Longest time a RD/WR spent in the output buffer.
    pub bus_wait_max: u64,
    /// Cycles in which a starved request blocked younger dispatches.
    pub qos_holds: u64,
}

impl Default for ControllerStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            skipped_cycles: 0,
            requests_admitted: 0,
            requests_retired: 0,
            backpressure_rejections: 0,
            queue_full_cycles: 0,
            total_latency: 0,
            max_latency: 0,
            row_hits: 0,
            row_misses: 0,
            reads: 0,
            writes: 0,
            activates: 0,
            precharges: 0,
            refreshes: 0,
            suppressed_output_ticks: 0,
            bus_wait_total: 0,
            bus_wait_max: 0,
            qos_holds: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"requests"`, `"row_buffer"`, `"commands"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "requests", "row_buffer", "commands"];

impl ControllerStats {
    /// Records a retirement with the given admission-to-retirement latency.
    pub fn record_retirement(&mut self, latency: u64) {
        self.requests_retired += 1;
        self.total_latency += latency;
        self.max_latency = self.max_latency.max(latency);
    }

    /// Records the cycles an emitted RD/WR waited between its bank issuing it and
    /// the bus carrying it.
    pub fn record_bus_wait(&mut self, cycles: u64) {
        self.bus_wait_total += cycles;
        self.bus_wait_max = self.bus_wait_max.max(cycles);
    }

    /// Mean bank-to-bus wait of emitted RD/WR in cycles.
    pub fn mean_bus_wait(&self) -> f64 {
        let emitted = self.reads + self.writes;
        if emitted == 0 {
            0.0
        } else {
            self.bus_wait_total as f64 / emitted as f64
        }
    }

    /// Total controller time covered, simulated or skipped.
    pub const fn elapsed_cycles(&self) -> u64 {
        self.cycles + self.skipped_cycles
    }

    /// Mean admission-to-retirement latency in cycles.
    pub fn mean_latency(&self) -> f64 {
        if self.requests_retired == 0 {
            0.0
        } else {
            self.total_latency as f64 / self.requests_retired as f64
        }
    }

    /// Fraction of dispatches that hit an open row, as a percentage.
    pub fn row_hit_rate(&self) -> f64 {
        let total = self.row_hits + self.row_misses;
        if total == 0 {
            0.0
        } else {
            100.0 * self.row_hits as f64 / total as f64
        }
    }

    /// Prints every statistics section to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Names from [`STATS_SECTIONS`], or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let elapsed = self.elapsed_cycles().max(1);

        if want("summary") {
            let khz = if seconds > 0.0 {
                (self.cycles as f64 / seconds) / 1000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("DRAM CONTROLLER STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_cycles_skipped       {}", self.skipped_cycles);
            println!("sim_freq                 {khz:.2} kHz");
            println!("----------------------------------------------------------");
        }
        if want("requests") {
            println!("REQUESTS");
            println!("  req.admitted           {}", self.requests_admitted);
            println!("  req.retired            {}", self.requests_retired);
            println!("  req.backpressure       {}", self.backpressure_rejections);
            println!(
                "  req.queue_full         {} ({:.2}%)",
                self.queue_full_cycles,
                (self.queue_full_cycles as f64 / elapsed as f64) * 100.0
            );
            println!("  req.latency_mean       {:.2}", self.mean_latency());
            println!("  req.latency_max        {}", self.max_latency);
            println!("  req.qos_holds          {}", self.qos_holds);
            println!("----------------------------------------------------------");
        }
        if want("row_buffer") {
            println!("ROW BUFFER");
            println!("  row.hits               {}", self.row_hits);
            println!("  row.misses             {}", self.row_misses);
            println!("  row.hit_rate           {:.2}%", self.row_hit_rate());
            println!("----------------------------------------------------------");
        }
        if want("commands") {
            println!("COMMANDS");
            println!("  cmd.rd                 {}", self.reads);
            println!("  cmd.wr                 {}", self.writes);
            println!("  cmd.act                {}", self.activates);
            println!("  cmd.pre                {}", self.precharges);
            println!("  cmd.ref                {}", self.refreshes);
            println!("  bus.refresh_blocked    {}", self.suppressed_output_ticks);
            println!("  bus.wait_mean          {:.2}", self.mean_bus_wait());
            println!("  bus.wait_max           {}", self.bus_wait_max);
            println!("----------------------------------------------------------");
        }
    }
}
