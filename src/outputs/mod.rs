//! Output generation for video scripts.
//!
//! # Submodules
//!
//! - [`scripts`]: Maps titles to file names and writes script text to disk
//!
//! # Output Structure
//!
//! ```text
//! tech_video_scripts/
//! ├── Show HN: A tiny database 2025-05-06.txt
//! programming_video_scripts/
//! ├── python if statement 2025-05-06.txt
//! history_video_scripts/
//! └── Why the Aztecs built on a lake 2025-05-06.txt
//! ```
//!
//! Files are write-once per title and day: a second run on the same date
//! replaces the earlier script.

pub mod scripts;
