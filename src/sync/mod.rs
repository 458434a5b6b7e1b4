pub mod batch;
pub mod normalize;
pub mod resolver;
pub mod update;

use std::path::Path;

use tracing::info;

use crate::config::AppConfig;
use crate::error::Result;
use crate::model::row::NormalizedRow;
use crate::providers::BoardProvider;
use crate::sheet;
use batch::{Pause, SyncReport, Synchronizer};
use resolver::BoardContext;

pub struct UploadRequest<'a> {
    pub board_name: &'a str,
    pub list_name: &'a str,
    pub input_folder: &'a Path,
}

/// Resolve the board, read the offer list, and push every row as a card.
///
/// Board and list are resolved before the workbook is opened, so a wrong
/// name fails fast. Only row-level failures are absorbed into the report.
pub async fn upload(
    provider: &dyn BoardProvider,
    config: &AppConfig,
    request: &UploadRequest<'_>,
    pause: &dyn Pause,
) -> Result<SyncReport> {
    info!(
        "Uploading to {} board '{}', list '{}'",
        provider.name(),
        request.board_name,
        request.list_name
    );
    let context = BoardContext::resolve(
        provider,
        request.board_name,
        request.list_name,
        &config.sync.custom_field,
    )
    .await?;
    info!(
        "Resolved board {} and list {}",
        context.board.id, context.list.id
    );

    let (path, rows) = sheet::load_offer_list(request.input_folder, &config.sheet)?;
    info!("Loaded {} rows from {}", rows.len(), path.display());

    let rows: Vec<NormalizedRow> = rows
        .into_iter()
        .map(|row| normalize::normalize(row, &config.reclass))
        .collect();

    let synchronizer = Synchronizer::new(provider, &context, &config.sync, pause);
    Ok(synchronizer.run(&rows).await)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_xlsxwriter::Workbook;

    use super::*;
    use crate::config::SheetLayout;
    use crate::error::SyncError;
    use crate::providers::tests::MockBoard;
    use crate::sheet::loader::REQUIRED_COLUMNS;

    struct NoPause;

    #[async_trait]
    impl Pause for NoPause {
        async fn pause(&self, _duration: Duration) {}
    }

    fn test_config() -> AppConfig {
        AppConfig {
            sheet: SheetLayout {
                extension: "xlsx".into(),
                header_row: 0,
                ..SheetLayout::default()
            },
            ..AppConfig::default()
        }
    }

    fn write_input(folder: &Path, rows: &[[&str; 10]]) {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name("Angebotsliste").unwrap();
        for (col, name) in REQUIRED_COLUMNS.iter().enumerate() {
            ws.write_string(0, col as u16, *name).unwrap();
        }
        for (i, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    ws.write_string(i as u32 + 1, col as u16, *value).unwrap();
                }
            }
        }
        workbook.save(folder.join("Angebote.xlsx")).unwrap();
    }

    #[tokio::test]
    async fn uploads_cleaned_and_normalized_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_input(
            dir.path(),
            &[
                ["H", "ACME", "Plant", "4711", "Service", "1500", "DE", "ES", "PS", "2024-05-01"],
                ["W", "ACME", "Plant", "0", "Service", "10", "DE", "ES", "GG", ""],
                ["X", "", "0", "4712", "", "", "", "", "", ""],
            ],
        );
        let provider = MockBoard::sales();
        let request = UploadRequest {
            board_name: "Sales",
            list_name: "Offers",
            input_folder: dir.path(),
        };

        let report = upload(&provider, &test_config(), &request, &NoPause)
            .await
            .unwrap();

        let cards: Vec<String> = provider
            .calls()
            .into_iter()
            .filter(|c| !c.starts_with("list_"))
            .collect();
        assert_eq!(
            cards,
            vec![
                "create:ACME_4711_Plant",
                "label:card-1:lab0",
                "member:card-1:m1",
                "field:card-1:cf1:1500",
                "create:BLANKO_4712_BLANKO",
                "field:card-2:cf1:0",
            ]
        );
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.applied(), 2);
    }

    #[tokio::test]
    async fn unknown_board_fails_before_reading_input() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockBoard::sales();
        let request = UploadRequest {
            board_name: "Nope",
            list_name: "Offers",
            // Does not exist; reading it would be an I/O error.
            input_folder: &dir.path().join("missing"),
        };

        let err = upload(&provider, &test_config(), &request, &NoPause)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::BoardNotFound(ref n) if n == "Nope"));
        assert_eq!(provider.calls(), vec!["list_boards"]);
    }

    #[tokio::test]
    async fn unknown_list_fails_before_reading_input() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockBoard::sales();
        let request = UploadRequest {
            board_name: "Sales",
            list_name: "Nope",
            input_folder: dir.path(),
        };

        let err = upload(&provider, &test_config(), &request, &NoPause)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::ListNotFound(_)));
    }

    #[tokio::test]
    async fn ambiguous_input_aborts_before_any_card() {
        let dir = tempfile::tempdir().unwrap();
        write_input(dir.path(), &[]);
        std::fs::copy(dir.path().join("Angebote.xlsx"), dir.path().join("Kopie.xlsx")).unwrap();
        let provider = MockBoard::sales();
        let request = UploadRequest {
            board_name: "Sales",
            list_name: "Offers",
            input_folder: dir.path(),
        };

        let err = upload(&provider, &test_config(), &request, &NoPause)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::AmbiguousSpreadsheet { .. }));
        assert!(!provider.calls().iter().any(|c| c.starts_with("create:")));
    }
}
