use std::fs;

// Monotonic build counter, baked into the binary as BUILD_NUMBER and shown
// by `life_gif --version`. The file is rewritten on every build, which also
// keeps the rerun-if-changed trigger firing.
fn main() {
    println!("cargo:rerun-if-changed=build_number.txt");

    let current: u32 = fs::read_to_string("build_number.txt")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1);

    println!("cargo:rustc-env=BUILD_NUMBER={current}");

    if let Err(e) = fs::write("build_number.txt", format!("{}\n", current + 1)) {
        println!("cargo:warning=could not update build_number.txt: {e}");
    }
}
