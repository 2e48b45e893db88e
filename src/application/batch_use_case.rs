// ============================================================
// Layer 2 — BatchUseCase
// ============================================================
// JSON lines in, JSON lines out, one output line per input line:
//
//   {"OverTime":"Yes","Age":41}   → {"prediction":"Yes","confidence":...}
//   {"Age":"abc"}                 → {"error":...,"kind":"encoding_error",...}
//   not json                      → {"error":...,"kind":"invalid_request",...}
//   #reload                       → {"reloaded":true,"model":"..."}
//   (blank)                       → skipped
//
// Lines between two `#reload` markers form a segment. A segment
// is split across N scoped worker threads sharing the one
// PredictUseCase; results are written back by line index, so the
// output order always matches the input order. The reload itself
// runs between segments, so every line before it sees the old
// model and every line after it sees the new one.

use serde::Serialize;

use crate::application::predict_use_case::{ApiResponse, PredictUseCase};
use crate::domain::raw_input::RawInput;

pub const RELOAD_DIRECTIVE: &str = "#reload";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchLine {
    Response(ApiResponse),
    Reload {
        reloaded: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        model:    Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error:    Option<String>,
    },
}

/// Per-run counts for the closing log line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub served:  usize,
    pub failed:  usize,
    pub reloads: usize,
}

pub struct BatchUseCase<'a> {
    predict: &'a PredictUseCase,
    workers: usize,
}

impl<'a> BatchUseCase<'a> {
    pub fn new(predict: &'a PredictUseCase, workers: usize) -> Self {
        Self { predict, workers: workers.max(1) }
    }

    /// Process every line, returning one BatchLine per non-blank line.
    pub fn run<S: AsRef<str> + Sync>(&self, lines: &[S]) -> (Vec<BatchLine>, BatchSummary) {
        let mut out     = Vec::with_capacity(lines.len());
        let mut summary = BatchSummary::default();
        let mut segment: Vec<&str> = Vec::new();

        for line in lines.iter().map(|l| l.as_ref().trim()) {
            if line.is_empty() {
                continue;
            }
            if line == RELOAD_DIRECTIVE {
                out.extend(self.run_segment(&segment, &mut summary));
                segment.clear();
                out.push(self.reload(&mut summary));
            } else {
                segment.push(line);
            }
        }
        out.extend(self.run_segment(&segment, &mut summary));

        tracing::info!(
            "Batch done: {} served, {} failed, {} reloads",
            summary.served,
            summary.failed,
            summary.reloads
        );
        (out, summary)
    }

    fn run_segment(&self, segment: &[&str], summary: &mut BatchSummary) -> Vec<BatchLine> {
        if segment.is_empty() {
            return Vec::new();
        }

        let chunk_size = segment.len().div_ceil(self.workers);
        let chunks: Vec<&[&str]> = segment.chunks(chunk_size).collect();
        let responses: Vec<ApiResponse> = std::thread::scope(|s| {
            let handles: Vec<_> = chunks
                .iter()
                .map(|&chunk| {
                    s.spawn(move || chunk.iter().map(|line| self.answer(line)).collect::<Vec<_>>())
                })
                .collect();

            handles
                .into_iter()
                .zip(&chunks)
                .flat_map(|(h, chunk)| {
                    h.join().unwrap_or_else(|_| {
                        tracing::error!("Batch worker panicked; failing its {} lines", chunk.len());
                        worker_panicked(chunk)
                    })
                })
                .collect()
        });

        for r in &responses {
            if r.is_served() {
                summary.served += 1;
            } else {
                summary.failed += 1;
            }
        }
        responses.into_iter().map(BatchLine::Response).collect()
    }

    fn answer(&self, line: &str) -> ApiResponse {
        match RawInput::from_json_str(line) {
            Ok(input) => ApiResponse::from_outcome(&input, &self.predict.encode_and_predict(&input)),
            Err(e)    => ApiResponse::invalid_request(format!("invalid JSON request: {e}")),
        }
    }

    fn reload(&self, summary: &mut BatchSummary) -> BatchLine {
        summary.reloads += 1;
        match self.predict.model().reload() {
            Ok(model) => BatchLine::Reload { reloaded: true, model: Some(model.describe()), error: None },
            Err(e)    => BatchLine::Reload { reloaded: false, model: None, error: Some(e.to_string()) },
        }
    }
}

/// One error per line of a chunk whose worker died, keeping the
/// output aligned with the input.
fn worker_panicked(chunk: &[&str]) -> Vec<ApiResponse> {
    chunk.iter().map(|_| ApiResponse::invalid_request("batch worker panicked")).collect()
}
