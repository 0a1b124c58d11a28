use anyhow::Context;
use cwd_kit::{LocalHost, Session};

fn main() -> anyhow::Result<()> {
    let tmp = std::env::temp_dir().join("cwd_kit_demo");
    std::fs::create_dir_all(&tmp)?;
    println!("Demo dir: {}", tmp.display());

    // the session starts in the demo dir; the process cwd is never touched
    let mut session = Session::with_cwd(LocalHost, &tmp)?;

    session.mkdir("docs/drafts")?;
    session.cd("docs")?;
    session.touch("first.txt")?;
    std::fs::write(session.resolve("second.txt"), "Hello, World!")?;

    for path in session.glob("*.txt")? {
        println!("found {}", path.display());
    }

    // rejected: nothing called `missing` here, cwd stays in docs
    if let Err(e) = session.cd("missing") {
        println!("{e}");
    }
    println!("still in {}", session.cwd().display());

    let greeting = session.cat("second.txt").context("reading the greeting")?;
    println!("{greeting}");

    session.cd("..")?;
    session.rm("docs")?;
    session.cd("/")?;
    session.rm(&tmp)?;
    Ok(())
}
