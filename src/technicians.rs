// Technician repository
use rusqlite::params;

use crate::db::Store;
use crate::error::{Error, Result};
use crate::models::{NewTechnician, Technician, TechnicianSummary};

/// Register a new technician. Only `nome` is required.
pub fn register(db: &Store, tech: &NewTechnician) -> Result<i64> {
    if tech.nome.trim().is_empty() {
        return Err(Error::validation("nome"));
    }

    let conn = db.lock();
    conn.execute(
        "INSERT INTO technicians (nome, cpf, rg, telefone, email) VALUES (?1,?2,?3,?4,?5)",
        params![tech.nome, tech.cpf, tech.rg, tech.telefone, tech.email],
    )?;
    let id = conn.last_insert_rowid();

    log::info!("Registered technician {}: {}", id, tech.nome);
    Ok(id)
}

/// List technicians, most recently registered first.
pub fn list(db: &Store) -> Result<Vec<TechnicianSummary>> {
    let conn = db.lock();
    let mut stmt =
        conn.prepare("SELECT id, nome, cpf, telefone FROM technicians ORDER BY id DESC")?;

    let techs = stmt
        .query_map([], |row| {
            Ok(TechnicianSummary {
                id: row.get(0)?,
                nome: row.get(1)?,
                cpf: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                telefone: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(techs)
}

/// Fetch a technician by id.
pub fn get_by_id(db: &Store, id: i64) -> Result<Technician> {
    let conn = db.lock();
    let mut stmt =
        conn.prepare("SELECT id, nome, cpf, rg, telefone, email FROM technicians WHERE id = ?1")?;

    let result = stmt.query_row([id], |row| {
        Ok(Technician {
            id: row.get(0)?,
            nome: row.get(1)?,
            cpf: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            rg: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            telefone: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            email: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        })
    });

    match result {
        Ok(tech) => Ok(tech),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::not_found("technician", id)),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_get() {
        let db = Store::open_in_memory().unwrap();
        let id = register(
            &db,
            &NewTechnician {
                nome: "João Silva".to_string(),
                cpf: "111.222.333-44".to_string(),
                telefone: "(11) 99999-0000".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let tech = get_by_id(&db, id).unwrap();
        assert_eq!(tech.nome, "João Silva");
        assert_eq!(tech.cpf, "111.222.333-44");
        assert_eq!(tech.rg, "");
    }

    #[test]
    fn test_register_requires_nome() {
        let db = Store::open_in_memory().unwrap();
        assert!(matches!(
            register(&db, &NewTechnician::default()),
            Err(Error::Validation { field: "nome" })
        ));
        assert!(list(&db).unwrap().is_empty());
    }

    #[test]
    fn test_list_is_most_recent_first() {
        let db = Store::open_in_memory().unwrap();
        for nome in ["Marcos", "Paula"] {
            register(
                &db,
                &NewTechnician {
                    nome: nome.to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let rows = list(&db).unwrap();
        let nomes: Vec<_> = rows.iter().map(|r| r.nome.as_str()).collect();
        assert_eq!(nomes, ["Paula", "Marcos"]);
    }

    #[test]
    fn test_get_by_id_missing_is_not_found() {
        let db = Store::open_in_memory().unwrap();
        assert!(matches!(
            get_by_id(&db, 7),
            Err(Error::NotFound {
                entity: "technician",
                id: 7
            })
        ));
    }
}
