use crate::domain::model::RawScanPayload;
use crate::domain::ports::ScanSource;
use crate::utils::error::{GuardError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// One payload per line, e.g. a wedge scanner typing into a terminal or a
/// capture file. Trailing `\r` is dropped; blank lines are skipped.
pub struct LineSource<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl LineSource<BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl LineSource<BufReader<tokio::fs::File>> {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(BufReader::new(file)))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> ScanSource for LineSource<R> {
    async fn next_payload(&mut self) -> Result<Option<RawScanPayload>> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| GuardError::SourceError {
                    message: e.to_string(),
                })?;

            match line {
                Some(line) => {
                    let line = line.strip_suffix('\r').unwrap_or(&line);
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Ok(Some(RawScanPayload::new(line)));
                }
                None => return Ok(None),
            }
        }
    }
}

/// Pre-recorded payloads, delivered in order.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    payloads: VecDeque<RawScanPayload>,
}

impl StaticSource {
    pub fn new<I, P>(payloads: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<RawScanPayload>,
    {
        Self {
            payloads: payloads.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ScanSource for StaticSource {
    async fn next_payload(&mut self) -> Result<Option<RawScanPayload>> {
        Ok(self.payloads.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_line_source_skips_blank_lines() {
        let input: &[u8] = b"cp-1\r\n\n  \ncp-2\n";
        let mut source = LineSource::new(BufReader::new(input));

        assert_eq!(source.next_payload().await.unwrap().unwrap().as_str(), "cp-1");
        assert_eq!(source.next_payload().await.unwrap().unwrap().as_str(), "cp-2");
        assert!(source.next_payload().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_line_source_keeps_inner_whitespace() {
        let input: &[u8] = b"Jane Smith|9001011234567|0821234567\n";
        let mut source = LineSource::new(BufReader::new(input));
        let payload = source.next_payload().await.unwrap().unwrap();
        assert_eq!(payload.as_str(), "Jane Smith|9001011234567|0821234567");
    }

    #[tokio::test]
    async fn test_static_source_in_order() {
        let mut source = StaticSource::new(["a", "b"]);
        assert_eq!(source.next_payload().await.unwrap().unwrap().as_str(), "a");
        assert_eq!(source.next_payload().await.unwrap().unwrap().as_str(), "b");
        assert!(source.next_payload().await.unwrap().is_none());
    }
}
