// SQLite store setup and schema creation
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Local;
use rusqlite::Connection;

use crate::error::Result;

/// Default store file, created in the working directory.
pub const DEFAULT_DB_FILE: &str = "gestao.db";

/// Text timestamp format used by every table.
pub const DATE_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time, formatted for storage.
pub(crate) fn now_timestamp() -> String {
    Local::now().format(DATE_FMT).to_string()
}

// Thread-safe connection wrapper shared by the repositories
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (or create) the store at the given path and ensure the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Open the default `gestao.db` in the working directory.
    pub fn open_default() -> Result<Self> {
        Self::open(DEFAULT_DB_FILE)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // The declared foreign keys are documentation only: cliente_id and
        // tecnico_id are soft references, resolved best-effort at opening
        // time. Bundled SQLite enforces them by default, so turn that off.
        conn.execute("PRAGMA foreign_keys = OFF", [])?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create the four tables if absent. Idempotent; never drops or
    /// migrates existing data.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.lock();
        create_tables(&conn)?;
        Ok(())
    }

    pub(crate) fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    // Clients table. Column names are kept as-is for compatibility with
    // existing gestao.db files.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            tipo_pessoa TEXT NOT NULL,
            documento TEXT NOT NULL,
            cep TEXT,
            rua TEXT,
            numero TEXT,
            bairro TEXT,
            cidade TEXT,
            estado TEXT,
            ponto_referencia TEXT,
            email TEXT,
            telefone_principal TEXT,
            telefone_secundario TEXT,
            nome_responsavel TEXT,
            cpf_responsavel TEXT,
            tel_responsavel TEXT,
            tel_zelador TEXT,
            observacoes TEXT,
            data_cadastro TEXT,
            status TEXT,
            modalidade_atendimento TEXT
        )",
        [],
    )?;

    // Technicians table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS technicians (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            cpf TEXT,
            rg TEXT,
            telefone TEXT,
            email TEXT
        )",
        [],
    )?;

    // Service orders table. Foreign keys are declared but not enforced;
    // cliente_id is a soft reference resolved at creation time.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cliente_id INTEGER NOT NULL,
            tipo_os TEXT,
            data_abertura TEXT,
            data_agendamento TEXT,
            horario_previsto TEXT,
            endereco_execucao TEXT,
            titulo TEXT,
            descricao TEXT,
            tecnico_id INTEGER,
            prioridade TEXT,
            canal_origem TEXT,
            equipamentos TEXT,
            status TEXT,
            checklist TEXT,
            tempo_estimado TEXT,
            materiais TEXT,
            fotos TEXT,
            assinatura_cliente TEXT,
            assinatura_tecnico TEXT,
            observacoes_finais TEXT,
            data_encerramento TEXT,
            FOREIGN KEY(cliente_id) REFERENCES clients(id),
            FOREIGN KEY(tecnico_id) REFERENCES technicians(id)
        )",
        [],
    )?;

    // Per-order audit log, append-only
    conn.execute(
        "CREATE TABLE IF NOT EXISTS history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER,
            timestamp TEXT,
            evento TEXT,
            responsavel TEXT,
            detalhes TEXT,
            FOREIGN KEY(order_id) REFERENCES orders(id)
        )",
        [],
    )?;

    Ok(())
}
