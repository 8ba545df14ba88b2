// Client repository
use rusqlite::params;

use crate::db::{now_timestamp, Store};
use crate::error::{Error, Result};
use crate::models::{Client, ClientStatus, ClientSummary, NewClient};

/// Default row cap for the listing query.
pub const DEFAULT_LIST_LIMIT: u32 = 200;

/// Register a new client. `nome`, `tipo_pessoa` and `documento` are
/// required; returns the assigned id.
pub fn register(db: &Store, client: &NewClient) -> Result<i64> {
    if client.nome.trim().is_empty() {
        return Err(Error::validation("nome"));
    }
    if client.tipo_pessoa.trim().is_empty() {
        return Err(Error::validation("tipo_pessoa"));
    }
    if client.documento.trim().is_empty() {
        return Err(Error::validation("documento"));
    }

    let data_cadastro = now_timestamp();
    let conn = db.lock();
    conn.execute(
        "INSERT INTO clients (
            nome, tipo_pessoa, documento, cep, rua, numero, bairro, cidade, estado,
            ponto_referencia, email, telefone_principal, telefone_secundario,
            nome_responsavel, cpf_responsavel, tel_responsavel, tel_zelador,
            observacoes, data_cadastro, status, modalidade_atendimento
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21)",
        params![
            client.nome,
            client.tipo_pessoa,
            client.documento,
            client.cep,
            client.rua,
            client.numero,
            client.bairro,
            client.cidade,
            client.estado,
            client.ponto_referencia,
            client.email,
            client.telefone_principal,
            client.telefone_secundario,
            client.nome_responsavel,
            client.cpf_responsavel,
            client.tel_responsavel,
            client.tel_zelador,
            client.observacoes,
            data_cadastro,
            client.status.to_string(),
            client.modalidade_atendimento,
        ],
    )?;
    let id = conn.last_insert_rowid();

    log::info!("Registered client {}: {}", id, client.nome);
    Ok(id)
}

/// List clients, most recently registered first.
pub fn list(db: &Store, limit: u32) -> Result<Vec<ClientSummary>> {
    let conn = db.lock();
    let mut stmt = conn.prepare(
        "SELECT id, nome, documento, cidade, status
         FROM clients ORDER BY id DESC LIMIT ?1",
    )?;

    let clients = stmt
        .query_map([limit], |row| {
            Ok(ClientSummary {
                id: row.get(0)?,
                nome: row.get(1)?,
                documento: row.get(2)?,
                cidade: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                status: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(clients)
}

/// Fetch a full client record by id.
pub fn get_by_id(db: &Store, id: i64) -> Result<Client> {
    let conn = db.lock();
    let mut stmt = conn.prepare(
        "SELECT id, nome, tipo_pessoa, documento, cep, rua, numero, bairro, cidade, estado,
                ponto_referencia, email, telefone_principal, telefone_secundario,
                nome_responsavel, cpf_responsavel, tel_responsavel, tel_zelador,
                observacoes, data_cadastro, status, modalidade_atendimento
         FROM clients WHERE id = ?1",
    )?;

    // Optional columns may be NULL in files written by hand or by older
    // versions; blanks and NULLs are treated the same.
    let result = stmt.query_row([id], |row| {
        Ok(Client {
            id: row.get(0)?,
            nome: row.get(1)?,
            tipo_pessoa: row.get(2)?,
            documento: row.get(3)?,
            cep: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            rua: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            numero: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            bairro: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
            cidade: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            estado: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
            ponto_referencia: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
            email: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
            telefone_principal: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
            telefone_secundario: row.get::<_, Option<String>>(13)?.unwrap_or_default(),
            nome_responsavel: row.get::<_, Option<String>>(14)?.unwrap_or_default(),
            cpf_responsavel: row.get::<_, Option<String>>(15)?.unwrap_or_default(),
            tel_responsavel: row.get::<_, Option<String>>(16)?.unwrap_or_default(),
            tel_zelador: row.get::<_, Option<String>>(17)?.unwrap_or_default(),
            observacoes: row.get::<_, Option<String>>(18)?.unwrap_or_default(),
            data_cadastro: row.get::<_, Option<String>>(19)?.unwrap_or_default(),
            status: ClientStatus::from_string(
                &row.get::<_, Option<String>>(20)?.unwrap_or_default(),
            ),
            modalidade_atendimento: row.get::<_, Option<String>>(21)?.unwrap_or_default(),
        })
    });

    match result {
        Ok(client) => Ok(client),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::not_found("client", id)),
        Err(e) => Err(e.into()),
    }
}

/// Comma-joined execution address for a client, skipping blank parts.
/// Returns an empty string when the client does not exist; used by order
/// opening to snapshot the address, so absence is not an error here.
pub fn get_address(db: &Store, id: i64) -> Result<String> {
    let conn = db.lock();
    let mut stmt =
        conn.prepare("SELECT rua, numero, bairro, cidade, estado FROM clients WHERE id = ?1")?;

    let result = stmt.query_row([id], |row| {
        let parts: Vec<Option<String>> = (0..5)
            .map(|i| row.get::<_, Option<String>>(i))
            .collect::<std::result::Result<_, _>>()?;
        Ok(parts
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", "))
    });

    match result {
        Ok(address) => Ok(address),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}
