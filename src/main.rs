//! Host-side helper: `cargo run` builds the wasm bundle into `static/pkg` and
//! serves `static/` at http://127.0.0.1:8000 for local preview.

use std::process::{Command, Stdio};
use std::{env, thread, time::Duration};

const PORT: &str = "8000";

fn main() {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return;
    }

    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors.");
            eprintln!("Ensure wasm-pack is installed: https://rustwasm.github.io/wasm-pack/");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH; the page may serve a stale pkg/.");
        }
    }

    println!("Serving portfolio at http://127.0.0.1:{PORT} …");
    let server = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(e) => {
            eprintln!("failed to start http server (python3 required): {e}");
            std::process::exit(1);
        }
    };

    // Keep process alive while the server runs.
    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                eprintln!("http server exited: {status}");
                std::process::exit(status.code().unwrap_or(1));
            }
            Ok(None) => thread::sleep(Duration::from_secs(1)),
            Err(e) => {
                eprintln!("lost track of http server: {e}");
                std::process::exit(1);
            }
        }
    }
}
