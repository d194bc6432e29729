use clap::Parser;

/// Window size, title and GL version are fixed, the only option is a
/// frame limit for unattended runs.
#[derive(Debug, Parser)]
#[command(about = "Spinning, bouncing triangle drawn with OpenGL 4.6")]
pub struct Args {
    /// Exit after this many frames instead of waiting for the window to close
    #[arg(long)]
    pub frames: Option<u64>,
}
