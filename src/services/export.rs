//! CSV export of a filtered shift list, laid out for pt-BR spreadsheets.

use chrono::NaiveDateTime;

use crate::database::models::{Hospital, Shift};
use crate::services::reports;

const BOM: char = '\u{feff}';

/// What the export covers, printed in the header block
pub struct ExportContext<'a> {
    pub period_label: &'a str,
    pub hospital_name: Option<&'a str>,
    pub show_economic_values: bool,
    pub generated_at: NaiveDateTime,
}

/// `1234.5` -> `1234,50`
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S]) {
    let row: Vec<String> = cells.iter().map(|c| escape_cell(c.as_ref())).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// `shifts` should already be filtered and sorted
pub fn shifts_to_csv(shifts: &[Shift], hospitals: &[Hospital], ctx: &ExportContext<'_>) -> String {
    let totals = reports::totals(shifts);
    let mut out = String::new();
    out.push(BOM);

    push_row(&mut out, &["RELATÓRIO DE PLANTÕES - MEDSHIFT"]);
    push_row(&mut out, &[""]);
    push_row(
        &mut out,
        &[format!(
            "Gerado em: {} às {}",
            ctx.generated_at.format("%d/%m/%Y"),
            ctx.generated_at.format("%H:%M:%S")
        )],
    );
    push_row(&mut out, &[format!("Período: {}", ctx.period_label)]);
    if let Some(name) = ctx.hospital_name {
        push_row(&mut out, &[format!("Hospital: {}", name)]);
    }
    push_row(&mut out, &[format!("Total de plantões: {}", totals.shift_count)]);
    push_row(&mut out, &[format!("Total de horas: {:.1}", totals.total_hours)]);
    if ctx.show_economic_values {
        push_row(
            &mut out,
            &[format!("Total ganho: R$ {}", format_amount(totals.total_amount))],
        );
        push_row(
            &mut out,
            &[format!("Valor pago: R$ {}", format_amount(totals.paid_amount))],
        );
        push_row(
            &mut out,
            &[format!("Valor pendente: R$ {}", format_amount(totals.pending_amount))],
        );
    }
    push_row(&mut out, &[""]);
    push_row(&mut out, &["DETALHAMENTO DOS PLANTÕES:"]);
    push_row(&mut out, &[""]);

    let mut headers = vec!["Data", "Hospital", "Início", "Fim", "Horas", "Status"];
    if ctx.show_economic_values {
        headers.push("Valor (R$)");
    }
    headers.push("Observações");
    push_row(&mut out, headers.as_slice());

    for shift in shifts {
        let hospital_name = hospitals
            .iter()
            .find(|h| h.id == shift.hospital_id)
            .map_or("N/A", |h| h.name.as_str());

        let mut row = vec![
            shift.start_date.format("%d/%m/%Y").to_string(),
            hospital_name.to_string(),
            shift.start_time.format("%H:%M").to_string(),
            shift.end_time.format("%H:%M").to_string(),
            format!("{:.1}", shift.total_hours),
            if shift.is_paid { "Pago" } else { "Pendente" }.to_string(),
        ];
        if ctx.show_economic_values {
            row.push(format_amount(shift.total_amount));
        }
        row.push(shift.notes.clone().unwrap_or_default());
        push_row(&mut out, row.as_slice());
    }

    out
}
