//! File loading for the refcompare tool.

use std::fs::File;
use std::io::{Read, BufReader, BufRead};
use std::path::Path;
use encoding_rs_io::DecodeReaderBytesBuilder;
use encoding_rs::Encoding;
use anyhow::{Context, Result};

/// Detects the encoding of a file
///
/// # Arguments
///
/// * `file_path` - Path to the file to detect encoding for
///
/// # Returns
///
/// A Result containing either the detected encoding or an error
pub fn detect_encoding<P: AsRef<Path>>(file_path: P) -> Result<&'static Encoding> {
    let file = File::open(&file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.as_ref().display()))?;
    let mut reader = BufReader::new(file);
    let mut buffer = [0; 1024];
    let bytes_read = reader.read(&mut buffer)
        .with_context(|| format!("Failed to read file: {}", file_path.as_ref().display()))?;

    let mut encoding_detector = chardetng::EncodingDetector::new();
    encoding_detector.feed(&buffer[..bytes_read], bytes_read < 1024);
    let encoding = encoding_detector.guess(None, true);

    Ok(encoding)
}

/// Reads a file fully into memory as an ordered vector of lines.
///
/// The file is decoded with its detected encoding. Lines keep their order and
/// content; only the line terminators are stripped.
///
/// # Arguments
///
/// * `file_path` - Path to the file to read
///
/// # Returns
///
/// A Result containing either the lines of the file or an error
pub fn read_lines<P: AsRef<Path>>(file_path: P) -> Result<Vec<String>> {
    let file_path = file_path.as_ref();

    let encoding = detect_encoding(file_path)
        .with_context(|| format!("Failed to detect encoding for file: {}", file_path.display()))?;

    let file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.display()))?;
    let decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .build(file);
    let reader = BufReader::new(decoder);

    let mut lines = Vec::new();
    for (index, line_result) in reader.lines().enumerate() {
        let line = line_result
            .with_context(|| format!("Failed to read line {} from file: {}", index + 1, file_path.display()))?;
        lines.push(line);
    }

    Ok(lines)
}
