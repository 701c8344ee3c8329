//! FFmpeg module - initialization and small wrappers around FFmpeg access

pub mod helpers;

pub use ffmpeg_next as ffmpeg;

/// Initialize FFmpeg library
///
/// Safe to call more than once; the probe and the writer both call it.
pub fn init() -> Result<(), crate::error::FfmpegError> {
    ffmpeg::init().map_err(|e| {
        crate::error::FfmpegError::InitFailed(format!("ffmpeg::init() failed: {}", e))
    })?;
    Ok(())
}

/// Quiet FFmpeg's own logging unless we are tracing
pub fn set_log_level(verbose: bool) {
    let level = if verbose {
        ffmpeg::util::log::Level::Info
    } else {
        ffmpeg::util::log::Level::Error
    };
    ffmpeg::util::log::set_level(level);
}
