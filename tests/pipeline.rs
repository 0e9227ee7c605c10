//! Pipeline tests
//!
//! Drives extraction and analysis end to end with in-process OCR, PDF and
//! model backends, so no external tools or network are needed.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use medreport::llm::{LlmError, ModelHandle, TextGenerator};
use medreport::ocr::{ExtractionError, OcrBackend, OcrError, OcrResult, PdfTextBackend, TextExtractor};
use medreport::services::{fallback_summary, RetryPolicy, Sleeper};
use medreport::{
    AnalysisSource, ChannelNotifier, ContentType, Document, Notification, PipelineError,
    ReportAnalyzer, ReportPipeline, Severity,
};

struct StaticOcr(Result<&'static str, &'static str>);

impl OcrBackend for StaticOcr {
    fn name(&self) -> &'static str {
        "static"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        "always available".to_string()
    }

    fn ocr_image(&self, _image_path: &Path) -> Result<OcrResult, OcrError> {
        self.0
            .map(|text| OcrResult {
                text: text.to_string(),
                processing_time_ms: 0,
            })
            .map_err(|e| OcrError::OcrFailed(e.to_string()))
    }
}

/// Records which thread ran OCR.
struct ThreadRecordingOcr(Mutex<Option<std::thread::ThreadId>>);

impl OcrBackend for ThreadRecordingOcr {
    fn name(&self) -> &'static str {
        "thread-recording"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        String::new()
    }

    fn ocr_image(&self, _image_path: &Path) -> Result<OcrResult, OcrError> {
        *self.0.lock().unwrap() = Some(std::thread::current().id());
        Ok(OcrResult {
            text: "TSH 2.1 mIU/L".to_string(),
            processing_time_ms: 0,
        })
    }
}

struct StaticPdf(Vec<&'static str>);

impl PdfTextBackend for StaticPdf {
    fn name(&self) -> &'static str {
        "static-pdf"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn page_count(&self, _pdf_path: &Path) -> Result<u32, ExtractionError> {
        Ok(self.0.len() as u32)
    }

    fn page_text(&self, _pdf_path: &Path, page: u32) -> Result<String, ExtractionError> {
        Ok(self.0[(page - 1) as usize].to_string())
    }
}

/// Model that fails `failures` times and then echoes a fixed summary.
struct ScriptedModel {
    failures: u32,
    calls: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            failures,
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(LlmError::Api("HTTP 503".to_string()));
        }
        Ok("Key findings: elevated LDL. Recommendation: follow up.".to_string())
    }
}

#[derive(Default)]
struct NoWait {
    count: AtomicU32,
}

#[async_trait]
impl Sleeper for NoWait {
    async fn sleep(&self, _duration: Duration) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

fn pipeline(
    ocr: StaticOcr,
    pdf: StaticPdf,
    model: Arc<ScriptedModel>,
    sleeper: Arc<NoWait>,
) -> ReportPipeline {
    let extractor = TextExtractor::with_backends(Arc::new(ocr), Arc::new(pdf));
    let analyzer = ReportAnalyzer::new(Arc::new(ModelHandle::new(model)))
        .with_retry_policy(RetryPolicy::new(3, Duration::from_secs(2)))
        .with_sleeper(sleeper);
    ReportPipeline::new(extractor, analyzer)
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

#[tokio::test]
async fn image_report_is_summarized_by_model() {
    let model = ScriptedModel::new(0);
    let sleeper = Arc::new(NoWait::default());
    let pipeline = pipeline(
        StaticOcr(Ok("\n  LDL 190 mg/dL  \n")),
        StaticPdf(vec![]),
        model.clone(),
        sleeper.clone(),
    );
    let (notifier, mut rx) = ChannelNotifier::channel();

    let document = Document::new(vec![0x89, b'P', b'N', b'G'], ContentType::Image);
    let result = pipeline.run(&document, &notifier).await.unwrap();

    assert_eq!(result.source, AnalysisSource::Model { attempts: 1 });
    assert!(result.text.starts_with("Key findings"));
    assert!(model.prompts.lock().unwrap()[0].ends_with("\n\nLDL 190 mg/dL"));
    assert_eq!(sleeper.count.load(Ordering::SeqCst), 0);

    let notes = drain(&mut rx);
    assert!(notes.iter().all(|n| n.severity == Severity::Info));
}

#[tokio::test]
async fn pdf_report_falls_back_when_model_keeps_failing() {
    let model = ScriptedModel::new(u32::MAX);
    let sleeper = Arc::new(NoWait::default());
    let pipeline = pipeline(
        StaticOcr(Ok("")),
        StaticPdf(vec!["Lipid panel ", "LDL 190"]),
        model.clone(),
        sleeper.clone(),
    );
    let (notifier, mut rx) = ChannelNotifier::channel();

    let document = Document::new(b"%PDF-1.4".to_vec(), ContentType::Pdf);
    let result = pipeline.run(&document, &notifier).await.unwrap();

    assert!(result.is_fallback());
    assert_eq!(result.text, fallback_summary("Lipid panel LDL 190", ContentType::Pdf));
    assert!(result.text.contains("Approximately 4 words"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 3);
    assert_eq!(sleeper.count.load(Ordering::SeqCst), 2);

    let notes = drain(&mut rx);
    let warnings = notes.iter().filter(|n| n.severity == Severity::Warning).count();
    let errors = notes.iter().filter(|n| n.severity == Severity::Error).count();
    assert_eq!((warnings, errors), (2, 1));
}

#[tokio::test]
async fn failed_extraction_halts_before_analysis() {
    let model = ScriptedModel::new(0);
    let pipeline = pipeline(
        StaticOcr(Err("tesseract exited with 1")),
        StaticPdf(vec![]),
        model.clone(),
        Arc::new(NoWait::default()),
    );
    let (notifier, mut rx) = ChannelNotifier::channel();

    let document = Document::new(vec![0xFF, 0xD8, 0xFF], ContentType::Image);
    let err = pipeline.run(&document, &notifier).await.unwrap_err();

    assert!(matches!(err, PipelineError::NoText(ContentType::Image)));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);

    let errors: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter(|n| n.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].message.contains("tesseract exited with 1"));
    assert!(errors[1].message.starts_with("No text could be extracted"));
}

#[tokio::test]
async fn whitespace_only_pdf_counts_as_no_text() {
    let pipeline = pipeline(
        StaticOcr(Ok("")),
        StaticPdf(vec!["  ", "\n"]),
        ScriptedModel::new(0),
        Arc::new(NoWait::default()),
    );
    let (notifier, _rx) = ChannelNotifier::channel();

    let document = Document::new(b"%PDF-1.4".to_vec(), ContentType::Pdf);
    let err = pipeline.run(&document, &notifier).await.unwrap_err();
    assert_eq!(err.to_string(), "No text could be extracted from the PDF");
}

#[tokio::test]
async fn extraction_runs_off_the_async_thread() {
    let ocr = Arc::new(ThreadRecordingOcr(Mutex::new(None)));
    let extractor = TextExtractor::with_backends(ocr.clone(), Arc::new(StaticPdf(vec![])));
    let analyzer = ReportAnalyzer::new(Arc::new(ModelHandle::new(ScriptedModel::new(0))))
        .with_sleeper(Arc::new(NoWait::default()));
    let pipeline = ReportPipeline::new(extractor, analyzer);
    let (notifier, _rx) = ChannelNotifier::channel();

    let document = Document::new(vec![0x89, b'P', b'N', b'G'], ContentType::Image);
    let result = pipeline.run(&document, &notifier).await.unwrap();
    assert!(!result.is_fallback());

    let ocr_thread = ocr.0.lock().unwrap().expect("ocr ran");
    assert_ne!(ocr_thread, std::thread::current().id());
}
