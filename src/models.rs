// Typed records for the four store tables
use serde::{Deserialize, Serialize};

// ==================== CLIENTS ====================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    #[default]
    Ativo,
    Inativo,
    Bloqueado,
}

impl ClientStatus {
    pub fn to_string(&self) -> String {
        match self {
            ClientStatus::Ativo => "Ativo".to_string(),
            ClientStatus::Inativo => "Inativo".to_string(),
            ClientStatus::Bloqueado => "Bloqueado".to_string(),
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Ativo" => ClientStatus::Ativo,
            "Inativo" => ClientStatus::Inativo,
            "Bloqueado" => ClientStatus::Bloqueado,
            _ => ClientStatus::Ativo,
        }
    }
}

/// Client registration input. `nome`, `tipo_pessoa` and `documento` are
/// required; everything else may be left blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewClient {
    pub nome: String,
    pub tipo_pessoa: String,
    pub documento: String,
    pub cep: String,
    pub rua: String,
    pub numero: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub ponto_referencia: String,
    pub email: String,
    pub telefone_principal: String,
    pub telefone_secundario: String,
    pub nome_responsavel: String,
    pub cpf_responsavel: String,
    pub tel_responsavel: String,
    pub tel_zelador: String,
    pub observacoes: String,
    pub status: ClientStatus,
    pub modalidade_atendimento: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub nome: String,
    pub tipo_pessoa: String,
    pub documento: String,
    pub cep: String,
    pub rua: String,
    pub numero: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub ponto_referencia: String,
    pub email: String,
    pub telefone_principal: String,
    pub telefone_secundario: String,
    pub nome_responsavel: String,
    pub cpf_responsavel: String,
    pub tel_responsavel: String,
    pub tel_zelador: String,
    pub observacoes: String,
    pub data_cadastro: String,
    pub status: ClientStatus,
    pub modalidade_atendimento: String,
}

/// Listing row: the columns shown by the clients tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: i64,
    pub nome: String,
    pub documento: String,
    pub cidade: String,
    pub status: String,
}

// ==================== TECHNICIANS ====================

/// Technician registration input. Only `nome` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTechnician {
    pub nome: String,
    pub cpf: String,
    pub rg: String,
    pub telefone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub rg: String,
    pub telefone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicianSummary {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub telefone: String,
}

// ==================== SERVICE ORDERS ====================

/// Order status. The set is closed for input validation, but transitions
/// are unconstrained: any status may move to any other via `set_status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Aberta,
    EmAndamento,
    Pendente,
    Concluida,
    Cancelada,
}

impl OrderStatus {
    pub fn to_string(&self) -> String {
        match self {
            OrderStatus::Aberta => "Aberta".to_string(),
            OrderStatus::EmAndamento => "Em andamento".to_string(),
            OrderStatus::Pendente => "Pendente".to_string(),
            OrderStatus::Concluida => "Concluída".to_string(),
            OrderStatus::Cancelada => "Cancelada".to_string(),
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Aberta" => OrderStatus::Aberta,
            "Em andamento" => OrderStatus::EmAndamento,
            "Pendente" => OrderStatus::Pendente,
            "Concluída" => OrderStatus::Concluida,
            "Cancelada" => OrderStatus::Cancelada,
            _ => OrderStatus::Aberta,
        }
    }
}

/// O.S. opening input: the fields collected by the opening form. The
/// remaining order columns (checklist closure fields, signatures, final
/// notes) stay NULL until filled in later in the order's life.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrder {
    pub cliente_id: Option<i64>,
    pub tipo_os: String,
    pub data_agendamento: String,
    pub horario_previsto: String,
    pub titulo: String,
    pub descricao: String,
    pub tecnico_id: Option<i64>,
    pub prioridade: String,
    pub canal_origem: String,
    pub equipamentos: String,
    pub checklist: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: i64,
    pub cliente_id: i64,
    pub tipo_os: String,
    pub data_abertura: String,
    pub data_agendamento: String,
    pub horario_previsto: String,
    /// Client address snapshot taken at opening time; not live-linked.
    pub endereco_execucao: String,
    pub titulo: String,
    pub descricao: String,
    pub tecnico_id: Option<i64>,
    pub prioridade: String,
    pub canal_origem: String,
    pub equipamentos: String,
    pub status: OrderStatus,
    pub checklist: String,
    pub tempo_estimado: Option<String>,
    pub materiais: Option<String>,
    pub fotos: Option<String>,
    pub assinatura_cliente: Option<String>,
    pub assinatura_tecnico: Option<String>,
    pub observacoes_finais: Option<String>,
    /// Set when the order transitions to Concluída, never cleared.
    pub data_encerramento: Option<String>,
}

/// Listing row joined with the owning client's name. `cliente` is None
/// when the order's client reference is dangling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: i64,
    pub cliente: Option<String>,
    pub tipo_os: String,
    pub data_abertura: String,
    pub prioridade: String,
    pub status: String,
}

// ==================== HISTORY ====================

/// Append-only audit record of an event affecting a service order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub order_id: i64,
    pub timestamp: String,
    pub evento: String,
    pub responsavel: String,
    pub detalhes: String,
}

// ==================== REPORT ROWS ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    /// Raw status text as stored; files written by older versions may
    /// carry labels outside the OrderStatus set.
    pub status: String,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicianPerformance {
    pub tecnico_id: i64,
    pub nome: String,
    pub concluidas: i64,
    /// Average open-to-closure time in hours across closed orders;
    /// 0.0 when the technician has no closed orders.
    pub horas_medias: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientOrderRow {
    pub id: i64,
    pub tipo_os: String,
    pub data_abertura: String,
    pub data_encerramento: Option<String>,
    pub status: String,
    pub titulo: String,
}
