use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use super::resolver::BoardContext;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::model::board::{CardRef, NewCard};
use crate::model::row::NormalizedRow;
use crate::providers::BoardProvider;

/// Suspension between batches.
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// The decoration steps that follow card creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStep {
    Label,
    Member,
    CustomField,
}

impl fmt::Display for CardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardStep::Label => f.write_str("label"),
            CardStep::Member => f.write_str("member assignment"),
            CardStep::CustomField => f.write_str("custom field"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Card created and every applicable decoration applied.
    Applied { card_id: String },
    /// Card created, then `failed_step` failed; later steps were not tried.
    Partial {
        card_id: String,
        failed_step: CardStep,
        error: String,
    },
    NotCreated { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowReport {
    pub offer_number: String,
    pub outcome: RowOutcome,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub batches: usize,
    pub outcomes: Vec<RowReport>,
}

impl SyncReport {
    fn count(&self, pred: impl Fn(&RowOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Applied { .. }))
    }

    pub fn partial(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Partial { .. }))
    }

    pub fn not_created(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::NotCreated { .. }))
    }

    /// Offer numbers of rows that were not fully applied, in input order.
    pub fn failed_offers(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|r| !matches!(r.outcome, RowOutcome::Applied { .. }))
            .map(|r| r.offer_number.as_str())
            .collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows in {} batches: {} applied, {} partially applied, {} not created",
            self.outcomes.len(),
            self.batches,
            self.applied(),
            self.partial(),
            self.not_created()
        )
    }
}

/// Consecutive chunks of at most `batch_size` rows, in order.
pub fn partition<T>(rows: &[T], batch_size: usize) -> Vec<&[T]> {
    rows.chunks(batch_size.max(1)).collect()
}

pub struct Synchronizer<'a> {
    provider: &'a dyn BoardProvider,
    context: &'a BoardContext,
    pause: &'a dyn Pause,
    batch_size: usize,
    batch_delay: Duration,
}

impl<'a> Synchronizer<'a> {
    pub fn new(
        provider: &'a dyn BoardProvider,
        context: &'a BoardContext,
        settings: &SyncConfig,
        pause: &'a dyn Pause,
    ) -> Self {
        Self {
            provider,
            context,
            pause,
            batch_size: settings.batch_size,
            batch_delay: settings.batch_delay(),
        }
    }

    /// Create one card per row. Row failures are logged and recorded, never
    /// propagated.
    pub async fn run(&self, rows: &[NormalizedRow]) -> SyncReport {
        let batches = partition(rows, self.batch_size);
        let total = batches.len();
        let mut report = SyncReport {
            batches: total,
            outcomes: Vec::with_capacity(rows.len()),
        };

        for (index, batch) in batches.into_iter().enumerate() {
            info!("Processing batch {} of {}...", index + 1, total);
            for row in batch {
                let outcome = self.sync_row(row).await;
                log_outcome(&row.offer_number, &outcome);
                report.outcomes.push(RowReport {
                    offer_number: row.offer_number.clone(),
                    outcome,
                });
            }

            if index + 1 < total {
                info!(
                    "Waiting for {} seconds before processing the next batch...",
                    self.batch_delay.as_secs()
                );
                self.pause.pause(self.batch_delay).await;
            }
        }

        report
    }

    async fn sync_row(&self, row: &NormalizedRow) -> RowOutcome {
        let new_card = NewCard {
            list_id: &self.context.list.id,
            name: &row.title,
            desc: &row.description,
            due: row.due.as_deref(),
        };
        let card = match self.provider.create_card(&new_card).await {
            Ok(card) => card,
            Err(e) => {
                return RowOutcome::NotCreated {
                    error: e.to_string(),
                }
            }
        };

        debug!(
            "Created card '{}' ({})",
            card.name,
            card.url.as_deref().unwrap_or("no url")
        );

        match self.decorate(&card, row).await {
            Ok(()) => RowOutcome::Applied { card_id: card.id },
            Err((failed_step, e)) => RowOutcome::Partial {
                card_id: card.id,
                failed_step,
                error: e.to_string(),
            },
        }
    }

    /// Label, member, custom field; the first failure ends the row.
    async fn decorate(
        &self,
        card: &CardRef,
        row: &NormalizedRow,
    ) -> Result<(), (CardStep, SyncError)> {
        let ctx = self.context;

        match row.label_name.as_ref().and_then(|name| ctx.labels.get(name)) {
            Some(label) => {
                debug!(
                    "Row {}: attaching label {} ({})",
                    row.offer_number,
                    label.name,
                    label.color.as_deref().unwrap_or("no color")
                );
                self.provider
                    .add_label(&card.id, &label.id)
                    .await
                    .map_err(|e| (CardStep::Label, e))?
            }
            None => debug!(
                "Row {}: no board label for {:?}, skipping label",
                row.offer_number, row.label_name
            ),
        }

        match row.member_name.as_ref().and_then(|name| ctx.members.get(name)) {
            Some(member_id) => self
                .provider
                .assign_member(&card.id, member_id)
                .await
                .map_err(|e| (CardStep::Member, e))?,
            None => debug!(
                "Row {}: no board member for {:?}, skipping assignment",
                row.offer_number, row.member_name
            ),
        }

        if let Some(field) = &ctx.order_volume {
            self.provider
                .set_custom_number(&card.id, &field.id, row.revenue)
                .await
                .map_err(|e| (CardStep::CustomField, e))?;
        }

        Ok(())
    }
}

fn log_outcome(offer_number: &str, outcome: &RowOutcome) {
    match outcome {
        RowOutcome::Applied { .. } => info!("Row {offer_number} added as a new card."),
        RowOutcome::Partial {
            card_id,
            failed_step,
            error,
        } => error!(
            "Error processing row {offer_number}: card {card_id} was created but {failed_step} failed: {error}"
        ),
        RowOutcome::NotCreated { error } => {
            error!("Error processing row {offer_number}: {error}")
        }
    }
}
