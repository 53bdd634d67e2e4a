//! Statistics service - dashboard figures for the session user

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::statistics::{self, CategoryTotal, DailyTrend, Overview, Totals};
use crate::domain::Session;
use crate::ports::Clock;

use super::ledger::LedgerService;

/// Feeds the session user's ledger into the aggregation functions
pub struct StatisticsService {
    ledger: Arc<LedgerService>,
    clock: Arc<dyn Clock>,
    trend_days: u32,
}

impl StatisticsService {
    pub fn new(ledger: Arc<LedgerService>, clock: Arc<dyn Clock>, trend_days: u32) -> Self {
        Self {
            ledger,
            clock,
            trend_days,
        }
    }

    pub fn totals(&self, session: &Session) -> Result<Totals> {
        let transactions = self.ledger.transactions(session)?;
        Totals::from_transactions(&transactions)
    }

    pub fn category_breakdown(&self, session: &Session) -> Result<Vec<CategoryTotal>> {
        let transactions = self.ledger.transactions(session)?;
        statistics::category_breakdown(&transactions)
    }

    /// Daily totals for the window ending at the clock's today
    pub fn daily_trend(&self, session: &Session) -> Result<Vec<DailyTrend>> {
        let transactions = self.ledger.transactions(session)?;
        statistics::daily_trend(&transactions, self.clock.today(), self.trend_days)
    }

    /// Totals, breakdown and trend from a single ledger read
    pub fn overview(&self, session: &Session) -> Result<Overview> {
        let transactions = self.ledger.transactions(session)?;
        Overview::compute(&transactions, self.clock.today(), self.trend_days)
    }
}
