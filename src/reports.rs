// Aggregate reports over orders, technicians and history
use crate::db::Store;
use crate::error::Result;
use crate::models::{ClientOrderRow, StatusCount, TechnicianPerformance};

/// Count orders grouped by their current status text.
///
/// Grouping is done on the raw column so rows carrying labels outside the
/// OrderStatus set (hand-edited or legacy files) still show up.
pub fn counts_by_status(db: &Store) -> Result<Vec<StatusCount>> {
    let conn = db.lock();
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM orders GROUP BY status")?;

    let counts = stmt
        .query_map([], |row| {
            Ok(StatusCount {
                status: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                total: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(counts)
}

/// Per-technician count of closed orders and average turnaround in hours,
/// busiest technician first. Technicians with no closed orders appear with
/// a zero count and a 0.0 average.
pub fn performance_by_technician(db: &Store) -> Result<Vec<TechnicianPerformance>> {
    let conn = db.lock();
    let mut stmt = conn.prepare(
        "SELECT t.id, t.nome,
                COUNT(o.id) as concluidas,
                AVG((julianday(o.data_encerramento) - julianday(o.data_abertura)) * 24)
         FROM technicians t
         LEFT JOIN orders o ON o.tecnico_id = t.id AND o.data_encerramento IS NOT NULL
         GROUP BY t.id
         ORDER BY concluidas DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(TechnicianPerformance {
                tecnico_id: row.get(0)?,
                nome: row.get(1)?,
                concluidas: row.get(2)?,
                horas_medias: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// All orders ever opened for a client, most recent first. Unknown clients
/// simply yield an empty list.
pub fn history_for_client(db: &Store, cliente_id: i64) -> Result<Vec<ClientOrderRow>> {
    let conn = db.lock();
    let mut stmt = conn.prepare(
        "SELECT o.id, o.tipo_os, o.data_abertura, o.data_encerramento, o.status, o.titulo
         FROM orders o WHERE o.cliente_id = ?1 ORDER BY o.id DESC",
    )?;

    let rows = stmt
        .query_map([cliente_id], |row| {
            Ok(ClientOrderRow {
                id: row.get(0)?,
                tipo_os: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                data_abertura: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                data_encerramento: row.get(3)?,
                status: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                titulo: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
