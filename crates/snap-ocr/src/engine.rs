use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Engine mode 3 (default), page segmentation 3 (fully automatic)
pub const RECOGNITION_ARGS: [&str; 4] = ["--oem", "3", "--psm", "3"];

/// Tesseract TSV row level for a single word
const WORD_LEVEL: u32 = 5;

/// One word as reported by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct OcrWord {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// 0-100, negative for rows without a recognized word
    pub confidence: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(
        "Tesseract is not installed or not in your PATH ({0}). \
         Please make sure Tesseract OCR is installed and configured correctly."
    )]
    NotInstalled(String),

    #[error("Tesseract exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Failed to talk to Tesseract: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable Tesseract output: {0}")]
    Output(String),
}

/// Blocking OCR backend fed with PNG bytes
pub trait OcrEngine: Send + Sync {
    /// Flat recognized text, untrimmed
    fn image_to_string(&self, png: &[u8], language: Option<&str>) -> Result<String, EngineError>;

    /// Per-word table in the engine's iteration order
    fn image_to_data(
        &self,
        png: &[u8],
        language: Option<&str>,
    ) -> Result<Vec<OcrWord>, EngineError>;
}

/// Drives the `tesseract` CLI over stdin/stdout
pub struct TesseractEngine {
    binary: String,
    tessdata_dir: Option<PathBuf>,
}

impl TesseractEngine {
    /// `tessdata_dir` is resolved by the caller, `None` leaves it to tesseract
    pub fn new(binary: impl Into<String>, tessdata_dir: Option<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            tessdata_dir,
        }
    }

    fn run(&self, png: &[u8], language: Option<&str>, tsv: bool) -> Result<String, EngineError> {
        let mut command = Command::new(&self.binary);
        command.arg("stdin").arg("stdout");
        if let Some(dir) = &self.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }
        if let Some(lang) = language {
            command.arg("-l").arg(lang);
        }
        command.args(RECOGNITION_ARGS);
        if tsv {
            command.arg("tsv");
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => EngineError::NotInstalled(self.binary.clone()),
                _ => EngineError::Io(e),
            })?;

        // tesseract may exit before reading stdin (e.g. unknown language), so the
        // image is fed from a helper thread while the child is reaped here
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(png),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (output, writer.join())
        });

        let output = output?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(EngineError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(EngineError::Io(e)),
            Err(_) => return Err(EngineError::Output("stdin writer panicked".to_string())),
        }
        if !stderr.is_empty() {
            tracing::debug!("tesseract: {}", stderr);
        }

        String::from_utf8(output.stdout).map_err(|e| EngineError::Output(e.to_string()))
    }
}

impl OcrEngine for TesseractEngine {
    fn image_to_string(&self, png: &[u8], language: Option<&str>) -> Result<String, EngineError> {
        self.run(png, language, false)
    }

    fn image_to_data(
        &self,
        png: &[u8],
        language: Option<&str>,
    ) -> Result<Vec<OcrWord>, EngineError> {
        parse_tsv(&self.run(png, language, true)?)
    }
}

/// Parse `tesseract ... tsv` output, keeping word rows only.
///
/// Columns: level page block par line word left top width height conf text
pub fn parse_tsv(tsv: &str) -> Result<Vec<OcrWord>, EngineError> {
    let mut words = Vec::new();

    for (line_no, line) in tsv.lines().enumerate() {
        if line.is_empty() || line.starts_with("level") {
            continue;
        }

        let fields: Vec<&str> = line.splitn(12, '\t').collect();
        if fields.len() < 11 {
            return Err(EngineError::Output(format!(
                "line {}: expected 12 columns, got {}",
                line_no + 1,
                fields.len()
            )));
        }

        let level: u32 = parse_field(fields[0], line_no)?;
        if level != WORD_LEVEL {
            continue;
        }

        words.push(OcrWord {
            left: parse_field(fields[6], line_no)?,
            top: parse_field(fields[7], line_no)?,
            width: parse_field(fields[8], line_no)?,
            height: parse_field(fields[9], line_no)?,
            confidence: parse_field(fields[10], line_no)?,
            text: fields.get(11).copied().unwrap_or_default().to_string(),
        });
    }

    Ok(words)
}

fn parse_field<T: std::str::FromStr>(field: &str, line_no: usize) -> Result<T, EngineError> {
    field.trim().parse().map_err(|_| {
        EngineError::Output(format!("line {}: bad value {:?}", line_no + 1, field))
    })
}
