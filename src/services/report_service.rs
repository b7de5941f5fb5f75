// src/services/report_service.rs

use std::sync::Arc;

use crate::{common::error::AppError, db::ReportRepository, models::report::ReportSummary};

/// Quantos aluguéis e pagamentos o relatório lista.
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportRepository>) -> Self {
        Self { reports }
    }

    pub async fn summary(&self) -> Result<ReportSummary, AppError> {
        self.reports.summary(RECENT_ACTIVITY_LIMIT).await
    }
}
