use std::process::Command;

fn git(args: &[&str]) -> String {
    match Command::new("git").args(args).output() {
        Ok(output) if output.status.success() => String::from_utf8(output.stdout)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "unknown".into()),
        _ => "unknown".into(),
    }
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rustc-env=GIT_HASH={}", git(&["rev-parse", "HEAD"]));
    println!(
        "cargo:rustc-env=GIT_HASH_SHORT={}",
        git(&["rev-parse", "--short", "HEAD"])
    );
}
