// Gestão - service order management core
// Handles SQLite persistence for clients, technicians, service orders
// and their per-order history, plus the derived reports. The presentation
// layer collects field values and consumes these calls directly.

pub mod clients;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod orders;
pub mod reports;
pub mod technicians;

pub use db::{Store, DATE_FMT, DEFAULT_DB_FILE};
pub use error::{Error, Result};
pub use export::{export_table, EXPORTABLE_TABLES};
pub use models::{
    Client, ClientOrderRow, ClientStatus, ClientSummary, HistoryEntry, NewClient, NewOrder,
    NewTechnician, OrderStatus, OrderSummary, ServiceOrder, StatusCount, Technician,
    TechnicianPerformance, TechnicianSummary,
};
