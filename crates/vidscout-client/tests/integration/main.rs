mod common;
mod drive_tests;
mod pipeline_tests;
mod youtube_tests;
