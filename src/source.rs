//! Content source readers
//!
//! One logical source (file path or URL) is turned into a finite sequence of
//! decoded text chunks. Small inputs are loaded whole; large or
//! unknown-length inputs are streamed in fixed-size chunks with a carry-over
//! buffer so a token is never severed across a chunk boundary. A stream
//! either fails once up front (open/connect/status) or mid-read, in which
//! case the caller discards whatever it accumulated for that source.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use reqwest::blocking::{Client, Response};

use crate::error::SourceError;

/// Default streaming chunk size (1 MB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Default cutoff below which a source is loaded as a single chunk (50 MB).
pub const DEFAULT_WHOLE_READ_LIMIT: u64 = 50 * 1024 * 1024;

/// Upper bound on the carry-over buffer. A token-character run longer than
/// this is emitted as-is and may be severed; anything shorter survives chunk
/// boundaries intact.
const MAX_CARRY: usize = 4096;

/// Sample size for encoding detection, matching a 64KB read.
const DETECT_SAMPLE: usize = 64 * 1024;

/// One logical origin of text content.
#[derive(Debug, Clone)]
pub enum Source {
    File {
        path: PathBuf,
    },
    Url {
        url: String,
        headers: Vec<(String, String)>,
    },
}

impl Source {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    pub fn url(url: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self::Url {
            url: url.into(),
            headers,
        }
    }

    /// Identifier used when reporting outcomes.
    pub fn label(&self) -> String {
        match self {
            Self::File { path } => path.display().to_string(),
            Self::Url { url, .. } => url.clone(),
        }
    }
}

/// A bounded piece of decoded text plus an end-of-stream marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub is_final: bool,
}

/// Characters that may appear inside any extractable token.
#[inline]
fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// Split `text` into (emit, carry) where `carry` is the trailing run of
/// token characters. A run spanning the whole text is carried in full (the
/// token may continue in the next chunk); only a run longer than
/// `MAX_CARRY` is emitted whole to keep memory bounded.
fn split_carry(text: String) -> (String, String) {
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        if is_token_char(c) {
            start = idx;
        } else {
            break;
        }
    }
    if text.len() - start > MAX_CARRY {
        return (text, String::new());
    }
    if start == 0 {
        return (String::new(), text);
    }
    let carry = text[start..].to_string();
    let mut emit = text;
    emit.truncate(start);
    (emit, carry)
}

/// Incremental decoder with replacement on invalid byte sequences. Never
/// silently truncates: every input byte contributes output or a U+FFFD.
pub struct StreamDecoder {
    decoder: encoding_rs::Decoder,
}

impl StreamDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder(),
        }
    }

    pub fn decode(&mut self, bytes: &[u8], last: bool) -> String {
        let cap = self
            .decoder
            .max_utf8_buffer_length(bytes.len())
            .unwrap_or(bytes.len().saturating_mul(3) + 16);
        let mut out = String::with_capacity(cap);
        let (_, _, had_errors) = self.decoder.decode_to_string(bytes, &mut out, last);
        if had_errors {
            log::warn!("invalid byte sequences replaced during decode");
        }
        out
    }
}

/// How to classify I/O errors raised mid-read.
enum ReadContext {
    File { path: String },
    Body { timeout_secs: u64 },
}

impl ReadContext {
    fn classify(&self, err: io::Error) -> SourceError {
        match self {
            Self::File { path } => SourceError::from_io(path, err),
            Self::Body { timeout_secs } => SourceError::from_body_read(*timeout_secs, err),
        }
    }
}

/// Fixed-size chunk reader with token carry-over.
pub struct ChunkedReader<R: Read> {
    reader: R,
    decoder: StreamDecoder,
    chunk_size: usize,
    carry: String,
    context: ReadContext,
    done: bool,
}

impl<R: Read> ChunkedReader<R> {
    fn new(reader: R, decoder: StreamDecoder, chunk_size: usize, context: ReadContext) -> Self {
        Self {
            reader,
            decoder,
            chunk_size,
            carry: String::new(),
            context,
            done: false,
        }
    }

    fn read_chunk(&mut self) -> Result<Chunk, SourceError> {
        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;
        let mut eof = false;

        while filled < self.chunk_size {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    eof = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.context.classify(e)),
            }
        }

        let decoded = self.decoder.decode(&buf[..filled], eof);
        let mut text = std::mem::take(&mut self.carry);
        text.push_str(&decoded);

        if eof {
            self.done = true;
            Ok(Chunk {
                text,
                is_final: true,
            })
        } else {
            let (emit, carry) = split_carry(text);
            self.carry = carry;
            Ok(Chunk {
                text: emit,
                is_final: false,
            })
        }
    }
}

impl<R: Read> Iterator for ChunkedReader<R> {
    type Item = Result<Chunk, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.read_chunk();
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

/// Lazy chunk sequence over one source. Restartable only from scratch by
/// reopening the source; not resumable mid-stream.
pub enum ChunkStream {
    Whole(Option<Chunk>),
    File(ChunkedReader<BufReader<File>>),
    Http(ChunkedReader<Response>),
}

impl Iterator for ChunkStream {
    type Item = Result<Chunk, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Whole(chunk) => chunk.take().map(Ok),
            Self::File(reader) => reader.next(),
            Self::Http(reader) => reader.next(),
        }
    }
}

/// Detect the encoding of a file by sampling its head. BOM wins; otherwise
/// chardetng guesses.
fn detect_encoding(path: &Path) -> Result<&'static Encoding, SourceError> {
    let label = path.display().to_string();
    let file = File::open(path).map_err(|e| SourceError::from_io(&label, e))?;
    let mut reader = BufReader::new(file);

    let mut sample = vec![0u8; DETECT_SAMPLE];
    let n = reader
        .read(&mut sample)
        .map_err(|e| SourceError::from_io(&label, e))?;
    sample.truncate(n);

    if n == 0 {
        return Ok(encoding_rs::UTF_8);
    }
    if let Some((encoding, _)) = Encoding::for_bom(&sample) {
        return Ok(encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&sample, true);
    Ok(detector.guess(None, true))
}

/// Open a file source: whole-load below the limit, chunked above it.
pub fn open_file(
    path: &Path,
    chunk_size: usize,
    whole_read_limit: u64,
) -> Result<ChunkStream, SourceError> {
    let label = path.display().to_string();
    let meta = fs::metadata(path).map_err(|e| SourceError::from_io(&label, e))?;

    if meta.len() <= whole_read_limit {
        let bytes = fs::read(path).map_err(|e| SourceError::from_io(&label, e))?;
        let encoding = if bytes.is_empty() {
            encoding_rs::UTF_8
        } else {
            let mut detector = EncodingDetector::new();
            detector.feed(&bytes[..bytes.len().min(DETECT_SAMPLE)], true);
            detector.guess(None, true)
        };
        let (text, _, had_errors) = encoding.decode(&bytes);
        if had_errors {
            log::warn!("{label}: invalid byte sequences replaced during decode");
        }
        return Ok(ChunkStream::Whole(Some(Chunk {
            text: text.into_owned(),
            is_final: true,
        })));
    }

    log::debug!(
        "{label}: {} exceeds whole-read limit, streaming in {} chunks",
        bytesize::ByteSize(meta.len()),
        bytesize::ByteSize(chunk_size as u64),
    );

    let encoding = detect_encoding(path)?;
    let file = File::open(path).map_err(|e| SourceError::from_io(&label, e))?;
    Ok(ChunkStream::File(ChunkedReader::new(
        BufReader::with_capacity(chunk_size.min(DETECT_SAMPLE), file),
        StreamDecoder::new(encoding),
        chunk_size,
        ReadContext::File { path: label },
    )))
}

/// Pull the charset label out of a Content-Type header, if any.
fn charset_from_headers(headers: &reqwest::header::HeaderMap) -> Option<&'static Encoding> {
    let content_type = headers
        .get(reqwest::header::CONTENT_TYPE)?
        .to_str()
        .ok()?;
    let charset = content_type
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("charset="))?;
    Encoding::for_label(charset.trim_matches('"').as_bytes())
}

/// Open a URL source: issue the GET, check status, then buffer or stream
/// depending on the declared content length.
pub fn open_url(
    client: &Client,
    url: &str,
    headers: &[(String, String)],
    chunk_size: usize,
    whole_read_limit: u64,
    timeout_secs: u64,
) -> Result<ChunkStream, SourceError> {
    let mut request = client.get(url);
    for (key, value) in headers {
        request = request.header(key.as_str(), value.as_str());
    }

    let response = request
        .send()
        .map_err(|e| SourceError::from_reqwest(timeout_secs, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::HttpStatus {
            code: status.as_u16(),
        });
    }

    match response.content_length() {
        Some(len) if len <= whole_read_limit => {
            let text = response
                .text()
                .map_err(|e| SourceError::from_reqwest(timeout_secs, e))?;
            Ok(ChunkStream::Whole(Some(Chunk {
                text,
                is_final: true,
            })))
        }
        declared => {
            log::debug!(
                "{url}: content length {declared:?}, streaming in {} chunks",
                bytesize::ByteSize(chunk_size as u64),
            );
            let encoding = charset_from_headers(response.headers()).unwrap_or(encoding_rs::UTF_8);
            Ok(ChunkStream::Http(ChunkedReader::new(
                response,
                StreamDecoder::new(encoding),
                chunk_size,
                ReadContext::Body { timeout_secs },
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn collect(stream: ChunkStream) -> Vec<Chunk> {
        stream.map(|c| c.unwrap()).collect()
    }

    fn chunked(text: &str, chunk_size: usize) -> ChunkedReader<Cursor<Vec<u8>>> {
        ChunkedReader::new(
            Cursor::new(text.as_bytes().to_vec()),
            StreamDecoder::new(encoding_rs::UTF_8),
            chunk_size,
            ReadContext::File {
                path: "test".to_string(),
            },
        )
    }

    #[test]
    fn test_split_carry_trailing_token() {
        let (emit, carry) = split_carry("hello world fo".to_string());
        assert_eq!(emit, "hello world ");
        assert_eq!(carry, "fo");
    }

    #[test]
    fn test_split_carry_clean_boundary() {
        let (emit, carry) = split_carry("hello world ".to_string());
        assert_eq!(emit, "hello world ");
        assert_eq!(carry, "");
    }

    #[test]
    fn test_split_carry_whole_run_is_carried() {
        // A chunk that is one unbroken token run may continue in the next
        // chunk, so the whole text is carried
        let (emit, carry) = split_carry("abcdefgh".to_string());
        assert_eq!(emit, "");
        assert_eq!(carry, "abcdefgh");
    }

    #[test]
    fn test_split_carry_oversized_run_emitted() {
        // A run past the carry cap is emitted whole to bound memory
        let run = "a".repeat(MAX_CARRY + 100);
        let (emit, carry) = split_carry(run.clone());
        assert_eq!(emit, run);
        assert_eq!(carry, "");
    }

    #[test]
    fn test_split_carry_keeps_dots_and_hyphens() {
        let (emit, carry) = split_carry("see report-v2.p".to_string());
        assert_eq!(emit, "see ");
        assert_eq!(carry, "report-v2.p");
    }

    #[test]
    fn test_chunked_reader_reassembles_tokens() {
        let text = "Fetch report-v2.pdf from user_data now";
        let reassembled: String = chunked(text, 7)
            .map(|c| c.unwrap().text)
            .collect();
        assert_eq!(reassembled, text);

        // No chunk may end mid-token (except the final one)
        let chunks: Vec<Chunk> = chunked(text, 7).map(|c| c.unwrap()).collect();
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                chunk.text.is_empty() || !is_token_char(chunk.text.chars().last().unwrap()),
                "non-final chunk ends mid-token: {:?}",
                chunk.text
            );
        }
        assert!(chunks.last().unwrap().is_final);
    }

    #[test]
    fn test_chunked_reader_token_longer_than_chunk() {
        // A token run spanning several whole chunks keeps accumulating in
        // the carry buffer instead of being severed
        let text = "see supercalifragilisticexpialidocious word";
        let chunks: Vec<Chunk> = chunked(text, 8).map(|c| c.unwrap()).collect();
        let reassembled: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(reassembled, text);
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                chunk.text.is_empty() || !is_token_char(chunk.text.chars().last().unwrap()),
                "non-final chunk ends mid-token: {:?}",
                chunk.text
            );
        }
    }

    #[test]
    fn test_chunked_reader_multibyte_at_boundary() {
        // U+00E9 is two bytes in UTF-8; odd chunk sizes land mid-codepoint
        let text = "caf\u{e9} r\u{e9}sum\u{e9} done ";
        let reassembled: String = chunked(text, 5).map(|c| c.unwrap().text).collect();
        assert_eq!(reassembled, text);
    }

    #[test]
    fn test_zero_byte_file() {
        let file = NamedTempFile::new().unwrap();
        let chunks = collect(open_file(file.path(), DEFAULT_CHUNK_SIZE, DEFAULT_WHOLE_READ_LIMIT).unwrap());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "");
        assert!(chunks[0].is_final);
    }

    #[test]
    fn test_small_file_whole_read() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "admin login.php secret-key").unwrap();
        let chunks = collect(open_file(file.path(), DEFAULT_CHUNK_SIZE, DEFAULT_WHOLE_READ_LIMIT).unwrap());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "admin login.php secret-key");
    }

    #[test]
    fn test_large_file_streams() {
        let mut file = NamedTempFile::new().unwrap();
        let line = "some words here and a file.txt token\n";
        for _ in 0..50 {
            write!(file, "{line}").unwrap();
        }
        file.flush().unwrap();

        // Force the chunked path with a tiny whole-read limit
        let chunks = collect(open_file(file.path(), 64, 16).unwrap());
        assert!(chunks.len() > 1);
        let reassembled: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(reassembled, line.repeat(50));
    }

    #[test]
    fn test_missing_file() {
        match open_file(
            Path::new("/no/such/file.txt"),
            DEFAULT_CHUNK_SIZE,
            DEFAULT_WHOLE_READ_LIMIT,
        ) {
            Err(SourceError::NotFound { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected NotFound for missing file"),
        }
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"valid \xff\xfe\xfd words").unwrap();
        let chunks = collect(open_file(file.path(), DEFAULT_CHUNK_SIZE, DEFAULT_WHOLE_READ_LIMIT).unwrap());
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].text.contains("valid"));
        assert!(chunks[0].text.contains("words"));
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(Source::file("/tmp/a.txt").label(), "/tmp/a.txt");
        assert_eq!(
            Source::url("http://example.com/x", Vec::new()).label(),
            "http://example.com/x"
        );
    }
}
