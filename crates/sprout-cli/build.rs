use std::env;

fn main() {
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();

    // Shown by `sprout --version`
    println!(
        "cargo:rustc-env=SPROUT_LONG_VERSION={} ({} {})",
        version, target, build_date
    );
    println!("cargo:rerun-if-changed=Cargo.toml");
}
