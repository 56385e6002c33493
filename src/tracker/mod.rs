//! Application state: the transaction collection, the currency setting and the store behind them.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::{
    chart::{self, PieChart},
    codec::{self, ExportPayload, FileFormat},
    config::{app_data_dir, Config, ConfigManager},
    currency::CurrencyCode,
    domain::{Transaction, TransactionType},
    errors::{Result, TrackerError},
    report::{self, MonthlyReport, ReportDelivery},
    stats::{self, CategoryShare, CategoryTotal, MonthlySummary, TransactionFilter},
    storage::{self, JsonFileStore, KeyValueStore},
    time::{Clock, SystemClock},
};

/// Coordinates the in-memory collection with persistence.
///
/// Every mutation updates memory first and then rewrites the stored
/// collection. A failed write is returned to the caller while the in-memory
/// state is kept.
pub struct Tracker {
    transactions: Vec<Transaction>,
    currency: String,
    config: Config,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    last_id: i64,
}

impl Tracker {
    /// Loads the stored collection and currency with the wall clock. The
    /// configured currency applies until one has been saved.
    pub fn open(store: Box<dyn KeyValueStore>, config: Config) -> Self {
        Self::with_clock(store, config, Box::new(SystemClock))
    }

    /// Opens the tracker rooted at the application data directory.
    pub fn open_default() -> Result<Self> {
        Self::open_in(app_data_dir())
    }

    /// Reads `config.json` from `base` and opens the file store it points at,
    /// `base` itself unless the config names another data directory.
    pub fn open_in(base: PathBuf) -> Result<Self> {
        let manager = ConfigManager::with_base_dir(base.clone())?;
        let config = manager.load()?;
        let data_dir = config.data_dir.clone().unwrap_or(base);
        let store = JsonFileStore::new(data_dir)?;
        Ok(Self::open(Box::new(store), config))
    }

    pub fn with_clock(store: Box<dyn KeyValueStore>, config: Config, clock: Box<dyn Clock>) -> Self {
        let transactions = storage::load_transactions(store.as_ref());
        let currency = storage::load_currency_or(store.as_ref(), &config.currency);
        info!(
            count = transactions.len(),
            currency = %currency,
            "tracker opened"
        );
        Self {
            transactions,
            currency,
            config,
            store,
            clock,
            last_id: 0,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Adds a new record. A blank id is replaced by a fresh one and the record
    /// is stamped with the current currency setting. Returns the stored id.
    pub fn add(&mut self, mut txn: Transaction) -> Result<String> {
        txn.validate()?;
        if txn.id.trim().is_empty() || self.get(&txn.id).is_some() {
            txn.id = self.fresh_id();
        }
        txn.currency = self.currency.clone();
        let id = txn.id.clone();
        debug!(id = %id, kind = %txn.kind, "adding transaction");
        self.transactions.push(txn);
        self.persist()?;
        Ok(id)
    }

    /// Replaces the record with the same id.
    pub fn update(&mut self, txn: Transaction) -> Result<()> {
        txn.validate()?;
        let slot = self
            .transactions
            .iter_mut()
            .find(|existing| existing.id == txn.id)
            .ok_or_else(|| TrackerError::NotFound(txn.id.clone()))?;
        *slot = txn;
        self.persist()
    }

    /// Removes the record with `id`; `Ok(false)` when nothing matched.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.transactions.len();
        self.transactions.retain(|txn| txn.id != id);
        if self.transactions.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Decodes a file and appends every record, or nothing at all on a decode failure.
    /// Ids that collide with existing records are reissued. Returns the number imported.
    pub fn import(&mut self, filename: &str, content: &str) -> Result<usize> {
        let decoded = codec::import_str_with_clock(
            filename,
            content,
            self.config.amount_policy,
            self.clock.as_ref(),
        )?;
        self.append(decoded)
    }

    pub fn import_file(&mut self, path: &Path) -> Result<usize> {
        let decoded = codec::import_file(path, self.config.amount_policy)?;
        self.append(decoded)
    }

    fn append(&mut self, decoded: Vec<Transaction>) -> Result<usize> {
        let mut seen: HashSet<String> = self.transactions.iter().map(|t| t.id.clone()).collect();
        let count = decoded.len();
        for mut txn in decoded {
            if !seen.insert(txn.id.clone()) {
                let fresh = self.fresh_id();
                debug!(old = %txn.id, new = %fresh, "reissuing colliding id");
                txn.id = fresh;
                seen.insert(txn.id.clone());
            }
            self.transactions.push(txn);
        }
        info!(count, "transactions imported");
        self.persist()?;
        Ok(count)
    }

    /// Drops every transaction from memory and storage.
    pub fn clear_all(&mut self) -> Result<()> {
        self.transactions.clear();
        storage::clear_transactions(self.store.as_ref())?;
        info!("all transactions cleared");
        Ok(())
    }

    pub fn set_currency(&mut self, code: &str) -> Result<()> {
        let code = CurrencyCode::new(code);
        if code.as_str().len() != 3 || !code.as_str().chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TrackerError::InvalidInput(format!(
                "`{}` is not a 3-letter currency code",
                code.as_str()
            )));
        }
        self.currency = code.as_str().to_string();
        storage::save_currency(self.store.as_ref(), &self.currency)
    }

    pub fn filtered(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        filter.apply(&self.transactions)
    }

    /// Newest transactions, as many as the configured limit.
    pub fn recent(&self) -> Vec<&Transaction> {
        stats::recent(&self.transactions, self.config.recent_limit)
    }

    pub fn monthly_summary(&self) -> MonthlySummary {
        self.summary_for(self.today())
    }

    pub fn summary_for(&self, reference: NaiveDate) -> MonthlySummary {
        stats::summarize_month(&self.transactions, reference)
    }

    /// Expense categories across the whole collection, with shares and colours.
    pub fn expense_breakdown(&self) -> Vec<CategoryShare> {
        stats::category_totals(&self.transactions, TransactionType::Expense).breakdown()
    }

    pub fn top_expense_categories(&self) -> Vec<CategoryTotal> {
        stats::category_totals(&self.transactions, TransactionType::Expense)
            .top(self.config.top_categories_limit)
    }

    pub fn income_expense_chart(&self, width: f64, height: f64) -> PieChart {
        let summary = self.monthly_summary();
        chart::layout_pie(&chart::income_expense_series(&summary), width, height)
    }

    pub fn category_chart(&self, width: f64, height: f64) -> PieChart {
        let totals = stats::category_totals(&self.transactions, TransactionType::Expense);
        chart::layout_pie(&totals.to_pairs(), width, height)
    }

    pub fn monthly_report(&self) -> MonthlyReport {
        report::monthly_report(&self.transactions, &self.currency, self.today())
    }

    pub fn send_monthly_report(&self, delivery: &mut dyn ReportDelivery) -> Result<()> {
        delivery.deliver(&self.monthly_report())
    }

    pub fn export(&self, format: FileFormat) -> Result<ExportPayload> {
        codec::export(
            &self.transactions,
            format,
            &self.config.export_prefix,
            self.today(),
        )
    }

    fn persist(&self) -> Result<()> {
        storage::save_transactions(self.store.as_ref(), &self.transactions)
    }

    fn fresh_id(&mut self) -> String {
        let now = self.clock.now().timestamp_millis();
        let mut value = now.max(self.last_id + 1);
        while self.get(&value.to_string()).is_some() {
            value += 1;
        }
        self.last_id = value;
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        storage::{MemoryStore, CURRENCY_KEY, TRANSACTIONS_KEY},
        time::FixedClock,
    };

    fn tracker_on(store: Arc<MemoryStore>, date: NaiveDate) -> Tracker {
        Tracker::with_clock(
            Box::new(store),
            Config::default(),
            Box::new(FixedClock::on_date(date)),
        )
    }

    fn jan_20() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
    }

    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(TrackerError::Storage("quota exceeded".into()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(TrackerError::Storage("quota exceeded".into()))
        }
    }

    #[derive(Default)]
    struct Outbox(Vec<MonthlyReport>);

    impl ReportDelivery for Outbox {
        fn deliver(&mut self, report: &MonthlyReport) -> Result<()> {
            self.0.push(report.clone());
            Ok(())
        }
    }

    #[test]
    fn add_assigns_ids_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker_on(store.clone(), jan_20());

        let first = tracker
            .add(Transaction::income("Salary", 5000.0, "Salary", "2024-01-15"))
            .unwrap();
        let second = tracker
            .add(Transaction::expense("Groceries", 120.5, "Food & Dining", "2024-01-20"))
            .unwrap();
        assert_ne!(first, second);
        assert!(!first.is_empty());

        let reopened = tracker_on(store, jan_20());
        assert_eq!(reopened.transactions(), tracker.transactions());
    }

    #[test]
    fn add_stamps_current_currency_and_rejects_bad_input() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker_on(store.clone(), jan_20());
        tracker.set_currency("eur").unwrap();
        assert_eq!(store.get(CURRENCY_KEY).unwrap().as_deref(), Some("EUR"));

        let id = tracker
            .add(Transaction::expense("Coffee", 3.5, "Food & Dining", "2024-01-02").with_currency("USD"))
            .unwrap();
        assert_eq!(tracker.get(&id).unwrap().currency, "EUR");

        let err = tracker
            .add(Transaction::expense("  ", 1.0, "Other", "2024-01-02"))
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
        assert!(matches!(
            tracker.set_currency("EURO"),
            Err(TrackerError::InvalidInput(_))
        ));
        assert_eq!(tracker.currency(), "EUR");
    }

    #[test]
    fn configured_currency_seeds_a_fresh_store() {
        let config = Config {
            currency: "GBP".into(),
            ..Config::default()
        };
        let tracker = Tracker::with_clock(
            Box::new(MemoryStore::new()),
            config,
            Box::new(FixedClock::on_date(jan_20())),
        );
        assert_eq!(tracker.currency(), "GBP");
    }

    #[test]
    fn update_and_remove_by_id() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker_on(store, jan_20());
        let id = tracker
            .add(Transaction::expense("Taxi", 18.0, "Transportation", "2024-01-05"))
            .unwrap();

        let mut edited = tracker.get(&id).unwrap().clone();
        edited.amount = 21.0;
        tracker.update(edited).unwrap();
        assert_eq!(tracker.get(&id).unwrap().amount, 21.0);

        let ghost = Transaction::expense("Ghost", 1.0, "Other", "2024-01-05").with_id("nope");
        assert!(matches!(tracker.update(ghost), Err(TrackerError::NotFound(_))));

        assert!(tracker.remove(&id).unwrap());
        assert!(!tracker.remove(&id).unwrap());
        assert!(tracker.transactions().is_empty());
    }

    #[test]
    fn import_appends_and_reissues_colliding_ids() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker_on(store, jan_20());
        tracker
            .add(Transaction::income("Salary", 5000.0, "Salary", "2024-01-15").with_id("1"))
            .unwrap();

        let csv = "ID,Type,Title,Amount,Currency,Category,Date,Payment Method,Description\n\
                   \"1\",\"expense\",\"Rent\",\"1200\",\"USD\",\"Housing\",\"2024-01-01\",\"\",\"\"\n\
                   \"7\",\"income\",\"Gift\",\"50\",\"USD\",\"Gifts\",\"2024-01-03\",\"\",\"\"\n";
        assert_eq!(tracker.import("backup.csv", csv).unwrap(), 2);
        assert_eq!(tracker.transactions().len(), 3);

        let ids: HashSet<_> = tracker.transactions().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(tracker.get("1").unwrap().title, "Salary");
        assert_eq!(tracker.get("7").unwrap().title, "Gift");
    }

    #[test]
    fn failed_import_leaves_collection_untouched() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker_on(store, jan_20());
        tracker
            .add(Transaction::income("Salary", 5000.0, "Salary", "2024-01-15"))
            .unwrap();

        assert!(matches!(
            tracker.import("data.txt", "[]"),
            Err(TrackerError::Format(_))
        ));
        assert!(matches!(
            tracker.import("data.json", "{\"not\": \"a list\"}"),
            Err(TrackerError::Format(_))
        ));
        assert_eq!(tracker.transactions().len(), 1);
    }

    #[test]
    fn failed_write_keeps_memory_state() {
        let backing = MemoryStore::new();
        backing.set(TRANSACTIONS_KEY, "[]").unwrap();
        let mut tracker = Tracker::with_clock(
            Box::new(ReadOnlyStore(backing)),
            Config::default(),
            Box::new(FixedClock::on_date(jan_20())),
        );

        let err = tracker
            .add(Transaction::expense("Lunch", 12.0, "Food & Dining", "2024-01-20"))
            .unwrap_err();
        assert!(matches!(err, TrackerError::Storage(_)));
        assert_eq!(tracker.transactions().len(), 1);
    }

    #[test]
    fn clear_all_empties_memory_and_store() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker_on(store.clone(), jan_20());
        tracker
            .add(Transaction::expense("Lunch", 12.0, "Food & Dining", "2024-01-20"))
            .unwrap();
        tracker.clear_all().unwrap();
        assert!(tracker.transactions().is_empty());
        assert_eq!(store.get(TRANSACTIONS_KEY).unwrap(), None);
    }

    #[test]
    fn views_follow_the_clock() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker_on(store, jan_20());
        tracker
            .add(Transaction::income("Salary", 5000.0, "Salary", "2024-01-15"))
            .unwrap();
        tracker
            .add(Transaction::expense("Groceries", 120.5, "Food & Dining", "2024-01-20"))
            .unwrap();
        tracker
            .add(Transaction::expense("Old rent", 900.0, "Housing", "2023-12-01"))
            .unwrap();

        let summary = tracker.monthly_summary();
        assert_eq!(summary.income, 5000.0);
        assert_eq!(summary.expenses, 120.5);
        assert_eq!(summary.balance, 4879.5);

        assert_eq!(tracker.recent()[0].title, "Groceries");
        assert_eq!(tracker.top_expense_categories()[0].category, "Housing");
        assert_eq!(tracker.expense_breakdown().len(), 2);
        assert!(tracker.income_expense_chart(300.0, 300.0).has_data());
        assert_eq!(tracker.category_chart(300.0, 300.0).slices().len(), 2);

        let january = TransactionFilter::new().month("2024-01".parse().unwrap());
        assert_eq!(tracker.filtered(&january).len(), 2);

        let export = tracker.export(FileFormat::Csv).unwrap();
        assert_eq!(export.filename, "yakstra_transactions_2024-01-20.csv");

        let mut outbox = Outbox::default();
        tracker.send_monthly_report(&mut outbox).unwrap();
        assert_eq!(outbox.0.len(), 1);
        assert!(outbox.0[0].body.contains("Total Income:    $5,000.00"));
        assert!(outbox.0[0].body.contains("Balance:         $4,879.50"));
    }
}
