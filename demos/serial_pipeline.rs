//! # Example: Serial Pipeline
//!
//! Three steps run one after another; each step receives the previous step's
//! value. The last step is a plain synchronous function wrapped with
//! `make_async`.
//!
//! Run with:
//! ```bash
//! cargo run --example serial_pipeline
//! ```

use std::time::Duration;

use taskflow::{make_async, serial, BoxTask, Done, TaskError, TaskFn};

/// Step that "fetches" a line of CSV after a short delay.
fn fetch() -> BoxTask<Option<String>, String> {
    TaskFn::boxed("fetch", |_: Option<String>, done: Done<String>| {
        tokio::spawn(async move {
            println!("[fetch] start");
            tokio::time::sleep(Duration::from_millis(200)).await;
            done.ok("3,1,4,1,5,9,2,6".to_string());
        });
    })
}

/// Step that sorts the numbers of the previous line.
fn sort() -> BoxTask<Option<String>, String> {
    TaskFn::boxed("sort", |prev: Option<String>, done: Done<String>| {
        let line = prev.unwrap_or_default();
        let nums: Result<Vec<u32>, _> = line.split(',').map(str::parse::<u32>).collect();
        match nums {
            Ok(mut nums) => {
                nums.sort_unstable();
                let out: Vec<String> = nums.iter().map(u32::to_string).collect();
                println!("[sort] {} values", out.len());
                done.ok(out.join(","));
            }
            Err(e) => done.err(format!("bad input: {e}")),
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let total = make_async(|prev: Option<String>| -> Result<String, TaskError> {
        let line = prev.ok_or("nothing to sum")?;
        let sum: u32 = line
            .split(',')
            .map(|s| s.parse::<u32>().map_err(|e| e.to_string()))
            .sum::<Result<u32, String>>()?;
        Ok(format!("{line} => {sum}"))
    });

    let total: BoxTask<Option<String>, String> = Box::new(total);

    let steps = vec![fetch(), sort(), total];
    match serial(steps).await {
        Ok(Some(out)) => println!("[pipeline] {out}"),
        Ok(None) => println!("[pipeline] no steps"),
        Err(e) => println!("[pipeline] failed: {e}"),
    }
}
