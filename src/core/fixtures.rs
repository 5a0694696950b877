//! Seed data loaded into every fresh workspace
//!
//! Aircraft codes referenced by tests and stages are written exactly as the
//! aircraft store holds them (`E175`, not `E-175`).

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::core::session::AccessLevel;
use crate::entities::aircraft::{Aircraft, AircraftKind, ProductionStatus};
use crate::entities::employee::Employee;
use crate::entities::part::{Part, PartKind, PartStatus};
use crate::entities::report::{Report, ReportKind, ReportStatus};
use crate::entities::stage::{Stage, StageStatus};
use crate::entities::test::{Test, TestKind, TestResult};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

pub fn employees() -> Vec<Employee> {
    use AccessLevel::*;
    [
        (101, "Professor Xavier", Administrator, "(12) 98888-0001", "Rua X, 100", "prof.x"),
        (201, "Jean Grey", Engineer, "(12) 98888-1111", "Rua A", "jean.g"),
        (202, "Ciclope", Operator, "(12) 98888-2222", "Rua B", "ciclope"),
        (203, "Tempestade", Operator, "(12) 98888-3333", "Rua C", "tempestade"),
        (204, "Wolverine", Operator, "(12) 98888-4444", "Rua Garra, 10", "logan"),
        (205, "Fera", Engineer, "(12) 98888-5555", "Rua Laboratório, 50", "fera.h"),
        (206, "Noturno", Operator, "(12) 98888-6666", "Rua Azul, 22", "noturno"),
        (207, "Colossus", Operator, "(12) 98888-7777", "Rua Aço, 80", "colossus"),
        (208, "Jubileu", Operator, "(12) 98888-8888", "Rua Fogos, 15", "jubileu"),
        (209, "Gambit", Operator, "(12) 98888-9999", "Rua Cartas, 21", "gambit"),
        (210, "Bishop", Engineer, "(12) 97777-0000", "Rua Futuro, 91", "bishop"),
        (211, "Mística", Operator, "(12) 97777-1111", "Rua Camuflada, 7", "mistica"),
    ]
    .into_iter()
    .map(|(id, name, level, phone, address, username)| Employee {
        id,
        name: name.to_string(),
        level,
        phone: phone.to_string(),
        address: address.to_string(),
        username: username.to_string(),
    })
    .collect()
}

fn stage(id: u32, name: &str, deadline: NaiveDate, status: StageStatus, crew: &[u32]) -> Stage {
    Stage {
        id,
        name: name.to_string(),
        deadline,
        status,
        employees: crew.to_vec(),
    }
}

fn stages_for(code: &str) -> Vec<Stage> {
    use StageStatus::*;
    match code {
        "E175" => vec![
            stage(1, "Desenho Final", date(2025, 1, 1), Done, &[201]),
            stage(2, "Montagem Fuselagem", date(2025, 3, 15), Done, &[202, 203]),
            stage(3, "Instalação Elétrica", date(2025, 5, 20), InProgress, &[204, 205]),
            stage(4, "Testes de Voo", date(2025, 10, 10), Pending, &[210]),
        ],
        "A350" => vec![stage(1, "Pintura Externa", date(2025, 7, 30), InProgress, &[206])],
        "F35" => vec![stage(1, "Montagem Armamento", date(2025, 9, 1), Pending, &[207])],
        _ => Vec::new(),
    }
}

pub fn aircraft() -> Vec<Aircraft> {
    use AircraftKind::*;
    use ProductionStatus::*;
    [
        ("E175", "EMB-175", Commercial, 88, InProduction),
        ("A350", "Airbus A350", Commercial, 300, Ready),
        ("F35", "Lockheed F-35", Military, 1, InTesting),
        ("G280", "Gulfstream G280", Commercial, 10, Delivered),
        ("B737", "Boeing 737 MAX", Commercial, 172, InProduction),
        ("KC390", "Embraer KC-390", Military, 80, InTesting),
        ("A220", "Airbus A220", Commercial, 120, Ready),
        ("F16", "General Dynamics F-16", Military, 1, Ready),
        ("ERJ145", "Embraer ERJ-145", Commercial, 50, Delivered),
        ("C130", "Lockheed C-130 Hercules", Military, 92, InProduction),
    ]
    .into_iter()
    .map(|(code, model, kind, capacity, status)| Aircraft {
        code: code.to_string(),
        model: model.to_string(),
        kind,
        capacity,
        range_km: 0,
        status,
        stages: stages_for(code),
    })
    .collect()
}

pub fn parts() -> Vec<Part> {
    use PartKind::*;
    use PartStatus::*;
    [
        (101, "Motor Esquerdo", Engine, "Rolls Royce", InStock, None, "A-01"),
        (102, "Asa Esquerda", Wing, "Airbus Aero", InUse, Some("A350"), "-"),
        (103, "Display Primário", Avionics, "Garmin", InMaintenance, None, "OFICINA-2"),
        (104, "Seção Central", Fuselage, "Embraer Estruturas", InUse, Some("E175"), "-"),
        (105, "Pneu Trem Pouso", LandingGear, "Michelin Aero", InStock, None, "B-07"),
        (106, "Asa Direita", Wing, "Boeing Parts", InUse, Some("B737"), "-"),
        (107, "Sistema de Navegação", Avionics, "Honeywell", InStock, None, "C-03"),
        (108, "Assento Executivo", Other, "Recaro Aircraft Seating", InUse, Some("G280"), "-"),
        (109, "Painel Frontal", Avionics, "Airbus Aero", InMaintenance, None, "OFICINA-1"),
        (110, "Motor Direito", Engine, "GE Aviation", InStock, None, "A-02"),
    ]
    .into_iter()
    .map(|(id, name, kind, supplier, status, aircraft, location)| Part {
        id,
        internal_code: format!("PC-{}", id),
        name: name.to_string(),
        kind,
        supplier: supplier.to_string(),
        status,
        aircraft: aircraft.map(str::to_string),
        entry_date: date(2025, 5, 2),
        last_updated: date(2025, 6, 1),
        warehouse_location: location.to_string(),
    })
    .collect()
}

pub fn tests() -> Vec<Test> {
    use TestKind::*;
    use TestResult::*;
    [
        (1, "E175", Electrical, date(2025, 5, 20), Some(date(2025, 5, 25)), Approved, "Carlos Souza"),
        (2, "E175", Hydraulic, date(2025, 5, 30), Some(date(2025, 6, 1)), Rejected, "Carlos Souza"),
        (3, "A350", Structural, date(2025, 7, 10), None, Pending, "Ana Lima"),
        (4, "F35", Flight, date(2025, 9, 1), None, Pending, "João Ribeiro"),
        (5, "A350", Software, date(2025, 7, 15), Some(date(2025, 7, 16)), Approved, "Ana Lima"),
        (6, "KC390", Structural, date(2025, 8, 12), None, Pending, "Maria Torres"),
        (7, "B737", Electrical, date(2025, 4, 25), Some(date(2025, 4, 26)), Approved, "Carlos Souza"),
        (8, "A220", Flight, date(2025, 6, 14), Some(date(2025, 6, 18)), Approved, "João Ribeiro"),
        (9, "C130", Hydraulic, date(2025, 5, 22), None, Pending, "Paulo Mendes"),
        (10, "G280", Software, date(2025, 7, 28), None, Pending, "Ana Lima"),
    ]
    .into_iter()
    .map(|(id, code, kind, scheduled, performed, result, responsible)| Test {
        id,
        aircraft_code: code.to_string(),
        kind,
        scheduled,
        performed,
        result,
        responsible: responsible.to_string(),
        notes: None,
    })
    .collect()
}

pub fn reports() -> Vec<Report> {
    use ReportKind::*;
    use ReportStatus::*;
    [
        (1, "Relatório Final Aeronave E-175", PerAircraft, date(2025, 6, 10), "Admin User", Generated, Some("/reports/e175_final.pdf")),
        (2, "Logística de Peças Mensal (Maio)", PartLogistics, date(2025, 6, 1), "Engenheiro Chefe", Generated, Some("/reports/pecas_maio.pdf")),
        (3, "Relatório de Testes de Voo A-350", Quality, date(2025, 6, 15), "QA Manager", Pending, None),
        (4, "Produção Geral Q2 2025", Production, date(2025, 7, 1), "Admin User", Error, None),
        (5, "Checklist de Estruturas KC-390", PerAircraft, date(2025, 7, 4), "Ana Lima", Generated, Some("/reports/kc390_estruturas.pdf")),
        (6, "Qualidade - Sistemas Elétricos B737", Quality, date(2025, 7, 12), "QA Manager", Generated, Some("/reports/b737_eletrica.pdf")),
        (7, "Relatório de Manutenção C-130", PerAircraft, date(2025, 8, 1), "Engenheiro Chefe", Pending, None),
        (8, "Produção Geral Q3 2025", Production, date(2025, 8, 10), "Admin User", Generated, Some("/reports/producao_q3.pdf")),
        (9, "Auditoria Interna - Estoque Peças", PartLogistics, date(2025, 9, 3), "Logística Supervisor", Generated, Some("/reports/estoque_auditoria.pdf")),
        (10, "Testes de Software G280", Quality, date(2025, 9, 15), "QA Manager", Error, None),
    ]
    .into_iter()
    .map(|(id, name, kind, generated_on, by, status, link)| Report {
        id,
        name: name.to_string(),
        kind,
        generated_on,
        generated_by: by.to_string(),
        status,
        download_link: link.map(str::to_string),
        parameters: BTreeMap::new(),
    })
    .collect()
}
