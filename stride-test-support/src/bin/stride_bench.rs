//! Orchestrator: sweeps producer/consumer thread counts over powers of two
//! and runs a final heavy/timed pass.
//!
//! ```text
//! stride-bench --times 5 --repeat 5 --min-threads 1 --max-threads 8 --heavy-ms 60000
//! ```

use std::process::ExitCode;
use std::time::Duration;

use stride::queue::StripedQueue;
use stride_test_support::checker::{ Checker, TaggedMessage };
use stride_test_support::driver::{ run_bounded, run_heavy, DriverConfig, HeavyConfig };

struct Args {
    times: u64,
    repeat: u32,
    min_threads: usize,
    max_threads: usize,
    heavy_ms: u64,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            times: 250_000,
            repeat: 5,
            min_threads: 1,
            max_threads: 8,
            heavy_ms: 60_000,
        }
    }
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(flag) = iter.next() {
        let mut next_u64 = || -> Result<u64, String> {
            iter.next()
                .ok_or_else(|| format!("{flag} requires a value"))?
                .parse::<u64>()
                .map_err(|e| format!("{flag}: {e}"))
        };

        match flag.as_str() {
            "--times" => args.times = next_u64()?,
            "--repeat" => args.repeat = next_u64()? as u32,
            "--min-threads" => args.min_threads = next_u64()? as usize,
            "--max-threads" => args.max_threads = next_u64()? as usize,
            "--heavy-ms" => args.heavy_ms = next_u64()?,
            other => return Err(format!("unrecognised flag: {other}")),
        }
    }

    Ok(args)
}

fn power_of_two_sweep(min_threads: usize, max_threads: usize, times: u64, repeat: u32) -> bool {
    let mut all_ok = true;
    let mut thread_count = min_threads.max(1);

    while thread_count <= max_threads {
        for trial in 0..repeat {
            let queue: StripedQueue<TaggedMessage> = StripedQueue::with_defaults();
            let checker = Checker::new(thread_count, times as usize);
            let config = DriverConfig {
                producers: thread_count,
                consumers: thread_count,
                messages_per_producer: times,
            };

            let report = run_bounded(&queue, &checker, &config);
            let ok = checker.is_consistent().is_ok();
            all_ok &= ok;

            println!(
                "producers={thread_count} consumers={thread_count} trial={trial} push_msgs_per_ms={:.1} pop_msgs_per_ms={:.1} push_ms={:.1} pop_ms={:.1} checker={}",
                report.push_messages_per_ms,
                report.pop_messages_per_ms,
                report.push_elapsed.as_secs_f64() * 1000.0,
                report.pop_elapsed.as_secs_f64() * 1000.0,
                if ok { "pass" } else { "FAIL" }
            );
        }

        thread_count *= 2;
    }

    all_ok
}

fn heavy_run(producers: usize, consumers: usize, duration_ms: u64) -> bool {
    let queue: StripedQueue<TaggedMessage> = StripedQueue::with_defaults();
    let config = HeavyConfig {
        producers,
        consumers,
        duration: Duration::from_millis(duration_ms),
        flow_control_threshold: 10 * (1 << 20),
        poll_interval: Duration::from_millis(250),
    };

    let summary = run_heavy(&queue, &config);
    println!(
        "heavy producers={producers} consumers={consumers} elapsed_ms={:.1} pushed={} popped={}",
        summary.elapsed.as_secs_f64() * 1000.0,
        summary.pushed,
        summary.popped,
    );

    // The heavy run has no message-identity checker; it only asserts the
    // queue itself never loses track of its own conservation invariant: by
    // the time producers stopped and consumers drained everything they
    // could see, popped can never exceed pushed.
    summary.popped <= summary.pushed
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("stride-bench: {message}");
            return ExitCode::from(2);
        }
    };

    let sweep_ok = power_of_two_sweep(args.min_threads, args.max_threads, args.times, args.repeat);
    let heavy_ok = heavy_run(4, 4, args.heavy_ms);

    if sweep_ok && heavy_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
