// Service order lifecycle: opening, status transitions, history log
use rusqlite::params;

use crate::clients;
use crate::db::{now_timestamp, Store};
use crate::error::{Error, Result};
use crate::models::{HistoryEntry, NewOrder, OrderStatus, OrderSummary, ServiceOrder};

/// Default row cap for the listing query.
pub const DEFAULT_LIST_LIMIT: u32 = 300;

/// Open a new service order. Requires `cliente_id`, `tipo_os` and `titulo`.
///
/// The execution address is snapshotted from the client at this moment; a
/// dangling `cliente_id` leaves it empty but the order is still created
/// (the reference is soft, matching the stored schema). The order row and
/// its "Abertura" history entry are written in one transaction.
pub fn open(db: &Store, order: &NewOrder) -> Result<i64> {
    let cliente_id = order.cliente_id.ok_or(Error::validation("cliente_id"))?;
    if order.tipo_os.trim().is_empty() {
        return Err(Error::validation("tipo_os"));
    }
    if order.titulo.trim().is_empty() {
        return Err(Error::validation("titulo"));
    }

    let endereco_execucao = clients::get_address(db, cliente_id)?;
    let prioridade = if order.prioridade.trim().is_empty() {
        "Média"
    } else {
        order.prioridade.as_str()
    };
    let canal_origem = if order.canal_origem.trim().is_empty() {
        "Telefone"
    } else {
        order.canal_origem.as_str()
    };
    let data_abertura = now_timestamp();

    let mut conn = db.lock();
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO orders (
            cliente_id, tipo_os, data_abertura, data_agendamento, horario_previsto,
            endereco_execucao, titulo, descricao, tecnico_id, prioridade,
            canal_origem, equipamentos, status, checklist
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)",
        params![
            cliente_id,
            order.tipo_os,
            data_abertura,
            order.data_agendamento,
            order.horario_previsto,
            endereco_execucao,
            order.titulo,
            order.descricao,
            order.tecnico_id,
            prioridade,
            canal_origem,
            order.equipamentos,
            OrderStatus::Aberta.to_string(),
            order.checklist,
        ],
    )?;
    let id = tx.last_insert_rowid();

    tx.execute(
        "INSERT INTO history (order_id, timestamp, evento, responsavel, detalhes)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            id,
            now_timestamp(),
            "Abertura",
            "Sistema",
            format!("O.S. aberta: {}", order.titulo),
        ],
    )?;
    tx.commit()?;

    log::info!("Opened O.S. {} for client {}", id, cliente_id);
    Ok(id)
}

/// Move an order to a new status and append the transition to its history.
///
/// Transitions are deliberately unconstrained: any status may move to any
/// other. Moving to Concluída stamps `data_encerramento` with the current
/// time, overwriting any value from a prior completion.
pub fn set_status(db: &Store, order_id: i64, status: OrderStatus) -> Result<()> {
    let mut conn = db.lock();
    let tx = conn.transaction()?;

    let exists = tx.query_row("SELECT id FROM orders WHERE id = ?1", [order_id], |row| {
        row.get::<_, i64>(0)
    });
    match exists {
        Ok(_) => {}
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(Error::not_found("order", order_id))
        }
        Err(e) => return Err(e.into()),
    }

    let label = status.to_string();
    tx.execute(
        "UPDATE orders SET status = ?1 WHERE id = ?2",
        params![label, order_id],
    )?;
    tx.execute(
        "INSERT INTO history (order_id, timestamp, evento, responsavel, detalhes)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            order_id,
            now_timestamp(),
            format!("Status alterado para {}", label),
            "Operador",
            "",
        ],
    )?;
    if status == OrderStatus::Concluida {
        tx.execute(
            "UPDATE orders SET data_encerramento = ?1 WHERE id = ?2",
            params![now_timestamp(), order_id],
        )?;
    }
    tx.commit()?;

    log::info!("O.S. {} moved to status {}", order_id, label);
    Ok(())
}

/// Fetch an order together with its history, oldest entry first.
pub fn get_by_id(db: &Store, order_id: i64) -> Result<(ServiceOrder, Vec<HistoryEntry>)> {
    let conn = db.lock();
    let mut stmt = conn.prepare(
        "SELECT id, cliente_id, tipo_os, data_abertura, data_agendamento, horario_previsto,
                endereco_execucao, titulo, descricao, tecnico_id, prioridade, canal_origem,
                equipamentos, status, checklist, tempo_estimado, materiais, fotos,
                assinatura_cliente, assinatura_tecnico, observacoes_finais, data_encerramento
         FROM orders WHERE id = ?1",
    )?;

    let result = stmt.query_row([order_id], |row| {
        Ok(ServiceOrder {
            id: row.get(0)?,
            cliente_id: row.get(1)?,
            tipo_os: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            data_abertura: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            data_agendamento: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            horario_previsto: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            endereco_execucao: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            titulo: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
            descricao: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            tecnico_id: row.get(9)?,
            prioridade: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
            canal_origem: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
            equipamentos: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
            status: OrderStatus::from_string(
                &row.get::<_, Option<String>>(13)?.unwrap_or_default(),
            ),
            checklist: row.get::<_, Option<String>>(14)?.unwrap_or_default(),
            tempo_estimado: row.get(15)?,
            materiais: row.get(16)?,
            fotos: row.get(17)?,
            assinatura_cliente: row.get(18)?,
            assinatura_tecnico: row.get(19)?,
            observacoes_finais: row.get(20)?,
            data_encerramento: row.get(21)?,
        })
    });

    let order = match result {
        Ok(order) => order,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(Error::not_found("order", order_id))
        }
        Err(e) => return Err(e.into()),
    };

    let mut stmt = conn.prepare(
        "SELECT id, order_id, timestamp, evento, responsavel, detalhes
         FROM history WHERE order_id = ?1 ORDER BY id",
    )?;
    let history = stmt
        .query_map([order_id], |row| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                order_id: row.get(1)?,
                timestamp: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                evento: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                responsavel: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                detalhes: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok((order, history))
}

/// List orders joined with the owning client's name, most recent first.
pub fn list(db: &Store, limit: u32) -> Result<Vec<OrderSummary>> {
    let conn = db.lock();
    let mut stmt = conn.prepare(
        "SELECT o.id, c.nome, o.tipo_os, o.data_abertura, o.prioridade, o.status
         FROM orders o LEFT JOIN clients c ON o.cliente_id = c.id
         ORDER BY o.id DESC LIMIT ?1",
    )?;

    let orders = stmt
        .query_map([limit], |row| {
            Ok(OrderSummary {
                id: row.get(0)?,
                cliente: row.get(1)?,
                tipo_os: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                data_abertura: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                prioridade: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                status: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewClient;

    fn store_with_client() -> (Store, i64) {
        let db = Store::open_in_memory().unwrap();
        let cliente_id = clients::register(
            &db,
            &NewClient {
                nome: "Ana".to_string(),
                tipo_pessoa: "Física".to_string(),
                documento: "111".to_string(),
                rua: "Rua A".to_string(),
                numero: "12".to_string(),
                cidade: "Campinas".to_string(),
                estado: "SP".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        (db, cliente_id)
    }

    fn sample_order(cliente_id: i64) -> NewOrder {
        NewOrder {
            cliente_id: Some(cliente_id),
            tipo_os: "Instalação".to_string(),
            titulo: "Troca de equipamento".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_open_sets_defaults_and_logs_history() {
        let (db, cliente_id) = store_with_client();
        let id = open(&db, &sample_order(cliente_id)).unwrap();

        let (order, history) = get_by_id(&db, id).unwrap();
        assert_eq!(order.status, OrderStatus::Aberta);
        assert_eq!(order.prioridade, "Média");
        assert_eq!(order.canal_origem, "Telefone");
        assert_eq!(order.endereco_execucao, "Rua A, 12, Campinas, SP");
        assert!(order.data_encerramento.is_none());

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].evento, "Abertura");
        assert_eq!(history[0].responsavel, "Sistema");
        assert_eq!(history[0].detalhes, "O.S. aberta: Troca de equipamento");
    }

    #[test]
    fn test_open_requires_cliente_tipo_titulo() {
        let (db, cliente_id) = store_with_client();

        let mut order = sample_order(cliente_id);
        order.cliente_id = None;
        assert!(matches!(
            open(&db, &order),
            Err(Error::Validation { field: "cliente_id" })
        ));

        let mut order = sample_order(cliente_id);
        order.titulo = "  ".to_string();
        assert!(matches!(
            open(&db, &order),
            Err(Error::Validation { field: "titulo" })
        ));

        // Rejected opens leave no order and no history behind
        assert!(list(&db, DEFAULT_LIST_LIMIT).unwrap().is_empty());
        let history_count: i64 = db
            .lock()
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))
            .unwrap();
        assert_eq!(history_count, 0);
    }

    #[test]
    fn test_open_with_dangling_client_still_creates() {
        let db = Store::open_in_memory().unwrap();
        let id = open(&db, &sample_order(99)).unwrap();

        let (order, _) = get_by_id(&db, id).unwrap();
        assert_eq!(order.cliente_id, 99);
        assert_eq!(order.endereco_execucao, "");

        // The join has nothing to resolve, so the client name is absent
        let rows = list(&db, DEFAULT_LIST_LIMIT).unwrap();
        assert_eq!(rows[0].cliente, None);
    }

    #[test]
    fn test_address_is_a_snapshot() {
        let (db, cliente_id) = store_with_client();
        let id = open(&db, &sample_order(cliente_id)).unwrap();

        db.lock()
            .execute("UPDATE clients SET rua = 'Rua Nova' WHERE id = ?1", [cliente_id])
            .unwrap();

        let (order, _) = get_by_id(&db, id).unwrap();
        assert_eq!(order.endereco_execucao, "Rua A, 12, Campinas, SP");
    }

    #[test]
    fn test_set_status_appends_history_and_stamps_closure() {
        let (db, cliente_id) = store_with_client();
        let id = open(&db, &sample_order(cliente_id)).unwrap();

        set_status(&db, id, OrderStatus::EmAndamento).unwrap();
        let (order, history) = get_by_id(&db, id).unwrap();
        assert_eq!(order.status, OrderStatus::EmAndamento);
        assert!(order.data_encerramento.is_none());
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].evento, "Status alterado para Em andamento");
        assert_eq!(history[1].responsavel, "Operador");

        set_status(&db, id, OrderStatus::Concluida).unwrap();
        let (order, history) = get_by_id(&db, id).unwrap();
        assert_eq!(order.status, OrderStatus::Concluida);
        assert!(order.data_encerramento.is_some());
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_transitions_are_unconstrained() {
        let (db, cliente_id) = store_with_client();
        let id = open(&db, &sample_order(cliente_id)).unwrap();

        set_status(&db, id, OrderStatus::Cancelada).unwrap();
        set_status(&db, id, OrderStatus::EmAndamento).unwrap();

        let (order, _) = get_by_id(&db, id).unwrap();
        assert_eq!(order.status, OrderStatus::EmAndamento);
    }

    #[test]
    fn test_recompletion_overwrites_closure_timestamp() {
        let (db, cliente_id) = store_with_client();
        let id = open(&db, &sample_order(cliente_id)).unwrap();

        set_status(&db, id, OrderStatus::Concluida).unwrap();
        let (order, _) = get_by_id(&db, id).unwrap();
        let first = order.data_encerramento.unwrap();

        // Backdate the stamp, then complete again: it must be rewritten
        db.lock()
            .execute(
                "UPDATE orders SET data_encerramento = '2000-01-01 00:00:00' WHERE id = ?1",
                [id],
            )
            .unwrap();
        set_status(&db, id, OrderStatus::Concluida).unwrap();
        let (order, _) = get_by_id(&db, id).unwrap();
        assert!(order.data_encerramento.unwrap() >= first);
    }

    #[test]
    fn test_set_status_missing_order_writes_nothing() {
        let db = Store::open_in_memory().unwrap();
        assert!(matches!(
            set_status(&db, 999, OrderStatus::Pendente),
            Err(Error::NotFound {
                entity: "order",
                id: 999
            })
        ));

        let history_count: i64 = db
            .lock()
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))
            .unwrap();
        assert_eq!(history_count, 0);
    }

    #[test]
    fn test_list_joins_client_name() {
        let (db, cliente_id) = store_with_client();
        open(&db, &sample_order(cliente_id)).unwrap();
        open(&db, &sample_order(cliente_id)).unwrap();

        let rows = list(&db, DEFAULT_LIST_LIMIT).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].id > rows[1].id);
        assert_eq!(rows[0].cliente.as_deref(), Some("Ana"));
        assert_eq!(rows[0].status, "Aberta");
    }
}
