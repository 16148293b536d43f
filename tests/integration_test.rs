use async_trait::async_trait;
use creditor_dashboard::clients::pipeline_client::{
    classify_compare_status, classify_upload_status,
};
use creditor_dashboard::config::Config;
use creditor_dashboard::error::{AppResult, ErrorKind};
use creditor_dashboard::models::{Folder, MatchStatus, RunResult, UploadFile, UploadReceipt};
use creditor_dashboard::orchestrator::Dashboard;
use creditor_dashboard::services::PipelineStep;
use creditor_dashboard::utils::logging;
use creditor_dashboard::workflow::{
    Notice, RunCompletion, RunCoordinator, RunState, UploadCoordinator, UploadState,
};
use creditor_dashboard::{PipelineApi, PipelineClient};
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};
use tokio_test::{assert_err, assert_ok};

const COMPARE_FIXTURE: &str = include_str!("fixtures/compare_response.json");

fn fixture_result() -> RunResult {
    serde_json::from_str(COMPARE_FIXTURE).expect("fixture 应该能解析")
}

/// 假后端：按文件夹名返回 fixture，可以模拟失败
#[derive(Default)]
struct FakeApi {
    folders: Mutex<Vec<Folder>>,
    compare_status: Option<u16>,
    upload_status: Option<u16>,
}

impl FakeApi {
    fn failing_compare(status: u16) -> Self {
        Self {
            compare_status: Some(status),
            ..Self::default()
        }
    }

    fn failing_upload(status: u16) -> Self {
        Self {
            upload_status: Some(status),
            ..Self::default()
        }
    }
}

#[async_trait]
impl PipelineApi for FakeApi {
    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        Ok(self.folders.lock().unwrap().clone())
    }

    async fn upload(&self, files: &[UploadFile]) -> AppResult<UploadReceipt> {
        if let Some(status) = self.upload_status {
            let status = StatusCode::from_u16(status).unwrap();
            return Err(classify_upload_status(status, "No PDF files uploaded".to_string()));
        }
        let folder_name = "upload_20250114_101500".to_string();
        self.folders.lock().unwrap().push(Folder {
            name: folder_name.clone(),
            path: None,
            pdf_count: files.len(),
            has_ground_truth: files.iter().any(UploadFile::is_ground_truth),
        });
        Ok(UploadReceipt {
            folder_name,
            count: files.len(),
        })
    }

    async fn compare(&self, folder: &str) -> AppResult<RunResult> {
        if let Some(status) = self.compare_status {
            let status = StatusCode::from_u16(status).unwrap();
            return Err(classify_compare_status(
                &format!("http://fake/compare/{}", folder),
                status,
                "backend said no".to_string(),
            ));
        }
        let mut result = fixture_result();
        result.extraction.folder = folder.to_string();
        Ok(result)
    }

    fn pdf_url(&self, folder: &str, filename: &str) -> String {
        format!("http://fake/pdf/{}/{}", folder, filename)
    }
}

fn dashboard_with(api: FakeApi) -> (Arc<FakeApi>, Dashboard) {
    let api = Arc::new(api);
    let dashboard = Dashboard::new(api.clone());
    (api, dashboard)
}

fn pdf(name: &str) -> UploadFile {
    UploadFile::new(name, b"%PDF-1.7".to_vec())
}

#[tokio::test]
async fn test_later_run_supersedes_earlier_one() {
    let (api, mut dash) = dashboard_with(FakeApi::default());

    dash.select_folder("folder_a");
    let ticket_a = dash.begin_run().unwrap();
    dash.select_folder("folder_b");
    let ticket_b = dash.begin_run().unwrap();

    // B 先回来，A 后回来
    let outcome_b = api.compare(&ticket_b.folder).await;
    let outcome_a = api.compare(&ticket_a.folder).await;

    assert!(matches!(
        dash.finish_run(&ticket_b, outcome_b),
        RunCompletion::Succeeded(_)
    ));
    assert_eq!(
        dash.finish_run(&ticket_a, outcome_a),
        RunCompletion::Superseded
    );

    assert_eq!(dash.result().unwrap().folder(), "folder_b");
    assert_eq!(dash.runs().state(), RunState::Succeeded);
}

#[tokio::test]
async fn test_run_start_resets_gate_before_response() {
    let (api, mut dash) = dashboard_with(FakeApi::default());
    dash.select_folder("folder_a");
    assert_ok!(match dash.run_selected().await {
        Some(RunCompletion::Succeeded(_)) => Ok(()),
        other => Err(other),
    });
    assert!(dash.select_view(PipelineStep::Compare));

    // 重试：请求发出前步骤门控已经归零
    let ticket = dash.begin_run().unwrap();
    assert_eq!(dash.runs().steps().completed_step(), 0);
    assert_eq!(dash.runs().steps().viewed_step(), PipelineStep::Ocr);
    assert!(dash.result().is_none());
    assert!(!dash.select_view(PipelineStep::Segments));

    let outcome = api.compare(&ticket.folder).await;
    dash.finish_run(&ticket, outcome);
    assert_eq!(dash.runs().steps().completed_step(), 4);
}

#[tokio::test]
async fn test_folder_switch_drops_in_flight_response() {
    let (api, mut dash) = dashboard_with(FakeApi::default());
    dash.select_folder("folder_a");
    let ticket = dash.begin_run().unwrap();

    dash.select_folder("folder_b");
    let outcome = api.compare(&ticket.folder).await;
    assert_eq!(dash.finish_run(&ticket, outcome), RunCompletion::Superseded);
    assert!(dash.result().is_none());
    assert_eq!(dash.runs().state(), RunState::Idle);
}

#[tokio::test]
async fn test_upload_with_ground_truth() {
    let (_api, mut dash) = dashboard_with(FakeApi::default());
    assert!(dash.choose_files(vec![pdf("invoice1.pdf"), pdf("creditors_list.pdf")]));

    let receipt = dash.upload_files().await.unwrap().unwrap();
    assert_eq!(receipt.count, 2);
    assert_eq!(
        dash.notice().map(Notice::message),
        Some(
            "Successfully uploaded 2 file(s) to folder \"upload_20250114_101500\" (includes ground truth)"
        )
    );
    assert_eq!(dash.uploads().state(), UploadState::Succeeded);
    assert!(dash.uploads().files().is_empty());
    assert_eq!(
        dash.selection().selected_folder(),
        Some("upload_20250114_101500")
    );
    let entries = dash.folder_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].summary, "2 PDFs ✓ GT");
    assert!(entries[0].selected);
}

#[tokio::test]
async fn test_upload_without_ground_truth() {
    let (_api, mut dash) = dashboard_with(FakeApi::default());
    dash.choose_files(vec![pdf("invoice1.pdf")]);

    dash.upload_files().await.unwrap().unwrap();
    assert_eq!(
        dash.notice().map(Notice::message),
        Some("Successfully uploaded 1 file(s) to folder \"upload_20250114_101500\"")
    );
}

#[tokio::test]
async fn test_upload_failure_keeps_files() {
    let (_api, mut dash) = dashboard_with(FakeApi::failing_upload(400));
    dash.choose_files(vec![pdf("invoice1.pdf")]);

    let failure = assert_err!(dash.upload_files().await.unwrap());
    assert_eq!(failure.kind, ErrorKind::Upload);
    assert_eq!(failure.message, "Upload failed: Bad Request - No PDF files uploaded");
    assert_eq!(dash.uploads().state(), UploadState::Failed);
    assert_eq!(dash.uploads().files().len(), 1);
    assert!(dash.notice().is_some_and(Notice::is_error));
    assert_eq!(dash.selection().selected_folder(), None);
}

#[tokio::test]
async fn test_timeout_and_extraction_messages_differ() {
    let (_api, mut timeout_dash) = dashboard_with(FakeApi::failing_compare(504));
    timeout_dash.select_folder("folder_a");
    let timeout = match timeout_dash.run_selected().await {
        Some(RunCompletion::Failed(failure)) => failure,
        other => panic!("应该失败: {:?}", other),
    };

    let (_api, mut error_dash) = dashboard_with(FakeApi::failing_compare(500));
    error_dash.select_folder("folder_a");
    let generic = match error_dash.run_selected().await {
        Some(RunCompletion::Failed(failure)) => failure,
        other => panic!("应该失败: {:?}", other),
    };

    assert_eq!(timeout.kind, ErrorKind::Timeout);
    assert_eq!(generic.kind, ErrorKind::Extraction);
    assert_ne!(timeout.message, generic.message);
    assert!(timeout.message.contains("timed out"));
    assert_eq!(
        generic.message,
        "Extraction failed: Internal Server Error (500) - backend said no"
    );

    // 失败后门控不变，结果为空
    assert_eq!(timeout_dash.runs().steps().completed_step(), 0);
    assert!(timeout_dash.current_view().is_none());
    assert_eq!(
        timeout_dash.notice().and_then(Notice::error_kind),
        Some(ErrorKind::Timeout)
    );
}

#[tokio::test]
async fn test_summary_is_displayed_unmodified() {
    let (_api, mut dash) = dashboard_with(FakeApi::default());
    dash.select_folder("folder_a");
    dash.run_selected().await;

    let result = dash.result().unwrap();
    let statuses: Vec<MatchStatus> = result.comparison.rows.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![MatchStatus::Exact, MatchStatus::Exact, MatchStatus::Missing]
    );
    assert_eq!(result.comparison.extra_rows.len(), 1);

    let cards = dash.summary_cards().unwrap();
    assert_eq!(cards.match_rate, 66.7);
    assert_eq!(cards.match_rate_label(), "66.7%");
    assert_eq!(cards.exact, 2);
    assert_eq!(cards.partial, 0);
    assert_eq!(cards.missing, 1);
}

#[tokio::test]
async fn test_step_views_share_selected_document() {
    let (_api, mut dash) = dashboard_with(FakeApi::default());
    dash.select_folder("folder_a");
    dash.run_selected().await;
    dash.select_document("invoice_a.pdf");

    assert!(dash.select_view(PipelineStep::Ocr));
    let ocr = dash.current_view().unwrap();
    assert_eq!(ocr.documents[0].label, "invoice_a.pdf (4 pages)");
    assert_eq!(ocr.documents[1].label, "invoice_b.pdf (0 pages)");
    assert!(ocr.documents[0].selected);
    let panel = ocr.panel.unwrap();
    assert_eq!(panel.pdf_url, "http://fake/pdf/folder_a/invoice_a.pdf");
    assert_eq!(panel.annotations.len(), 4);

    assert!(dash.select_view(PipelineStep::Segments));
    let segments = dash.current_view().unwrap();
    assert_eq!(segments.documents[0].label, "invoice_a.pdf (2 segments)");
    let panel = segments.panel.unwrap();
    let colors: Vec<_> = panel
        .annotations
        .iter()
        .map(|a| a.segment_color.clone())
        .collect();
    assert_eq!(colors[0], colors[1]);
    assert_ne!(colors[1], colors[2]);
    assert_eq!(panel.legend[1].label(), "Segment 2: Pages 3, 4");

    assert!(dash.select_view(PipelineStep::Extract));
    let extract = dash.current_view().unwrap();
    assert_eq!(extract.documents[0].label, "invoice_a.pdf (2 creditors)");
    let highlighted: Vec<u32> = extract
        .panel
        .unwrap()
        .annotations
        .iter()
        .filter(|a| a.highlighted)
        .map(|a| a.page)
        .collect();
    assert_eq!(highlighted, vec![1, 2]);

    assert!(dash.select_view(PipelineStep::Compare));
    let compare = dash.current_view().unwrap();
    let comparison = compare.comparison.unwrap();
    assert_eq!(
        comparison.ground_truth_pdf_url,
        "http://fake/pdf/folder_a/creditors_list.pdf"
    );
    assert_eq!(comparison.rows[2].extracted_name, None);
    assert_eq!(comparison.rows[2].extracted_amount, "—");
    assert_eq!(comparison.rows[0].ground_truth_amount, "1.234,56\u{a0}€");
    assert_eq!(comparison.extra_rows[0].name, "Inkasso Nord GmbH");
}

#[tokio::test]
async fn test_unknown_document_renders_nothing_for_overlays() {
    let (_api, mut dash) = dashboard_with(FakeApi::default());
    dash.select_folder("folder_a");
    dash.run_selected().await;
    dash.select_document("ghost.pdf");

    dash.select_view(PipelineStep::Segments);
    assert!(dash.current_view().unwrap().panel.is_none());

    // OCR 视图仍然给出 PDF 地址，只是没有标注
    dash.select_view(PipelineStep::Ocr);
    let panel = dash.current_view().unwrap().panel.unwrap();
    assert!(panel.annotations.is_empty());
}

#[tokio::test]
async fn test_document_details_use_fallback_labels() {
    let (_api, mut dash) = dashboard_with(FakeApi::default());
    dash.select_folder("folder_a");
    dash.run_selected().await;
    assert!(dash.toggle_document_details("invoice_a.pdf"));

    let details = dash.document_details();
    assert_eq!(details[0].summary, "4 pages, 2 segments, 2 creditors");
    assert!(details[0].expanded);
    assert!(!details[1].expanded);
    assert_eq!(
        details[0].segments[0].preview,
        "Sehr geehrte Damen und Herren, hiermit fordern wir..."
    );
    assert_eq!(details[0].creditors[1].reference, "No ref");
    assert_eq!(details[0].creditors[1].amount, "89,90\u{a0}€");
    assert_eq!(details[1].creditors[0].pages, "3");
}

#[tokio::test]
async fn test_loosely_typed_record_fields_keep_the_run() {
    let mut payload: serde_json::Value = serde_json::from_str(COMPARE_FIXTURE).unwrap();
    let creditor = &mut payload["extraction"]["documents"][0]["extracted_creditors"][1];
    creditor["aktenzeichen"] = serde_json::json!(4711);
    creditor["source_pages"] = serde_json::json!([1.0, null, "3"]);
    payload["comparison"]["rows"][0]["gt_name"] = serde_json::json!("");
    let result: RunResult = assert_ok!(serde_json::from_value(payload));

    let (_api, mut dash) = dashboard_with(FakeApi::default());
    dash.select_folder("folder_a");
    let ticket = dash.begin_run().unwrap();
    assert!(matches!(
        dash.finish_run(&ticket, Ok(result)),
        RunCompletion::Succeeded(_)
    ));

    let details = dash.document_details();
    assert_eq!(details[0].creditors[1].reference, "4711");
    assert_eq!(details[0].creditors[1].pages, "1, 3");

    assert!(dash.select_view(PipelineStep::Compare));
    let comparison = dash.current_view().unwrap().comparison.unwrap();
    assert_eq!(comparison.rows[0].ground_truth_name, "Unknown");
}

#[tokio::test]
async fn test_coordinators_drive_the_api_directly() {
    let api = FakeApi::default();

    let mut uploads = UploadCoordinator::new();
    assert!(uploads.upload(&api).await.is_none());
    uploads.choose_files(vec![pdf("CREDITORS_LIST.PDF")]);
    let receipt = assert_ok!(uploads.upload(&api).await.unwrap());
    assert_eq!(receipt.count, 1);
    assert!(uploads
        .message()
        .unwrap()
        .message()
        .ends_with("(includes ground truth)"));

    let mut runs = RunCoordinator::new();
    match runs.run(&api, &receipt.folder_name).await {
        RunCompletion::Succeeded(result) => {
            assert_eq!(result.folder(), "upload_20250114_101500");
            assert_eq!(result.documents().len(), 2);
        }
        other => panic!("应该成功: {:?}", other),
    }
    assert_eq!(runs.generation(), 1);
    assert!(runs.select_view(PipelineStep::Extract));
}

#[tokio::test]
#[ignore] // 默认忽略，需要后端运行：cargo test -- --ignored
async fn test_live_backend_folders() {
    // 初始化日志
    logging::init(true);

    // 加载配置
    let config = Config::from_env();

    let client = PipelineClient::new(&config).expect("后端地址配置错误");
    let folders = client.list_folders().await;

    assert!(folders.is_ok(), "应该能够获取文件夹列表");
    println!("找到 {} 个文件夹", folders.unwrap().len());
}
