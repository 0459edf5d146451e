// Embeds the short git revision into the binary so that 'flagconf version'
// can report exactly what was built. Builds outside of a git checkout simply
// go without it.
fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    if let Some(rev) = revision() {
        println!("cargo:rustc-env=FLAGCONF_REVISION={}", rev);
    }
}

fn revision() -> Option<String> {
    let out = std::process::Command::new("git")
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    let rev = rev.trim();
    if rev.is_empty() {
        None
    } else {
        Some(rev.to_string())
    }
}
