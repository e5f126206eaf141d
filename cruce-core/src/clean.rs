//! Single-sheet extraction: the "clean dataset" path
//!
//! Takes the raw grid of a sales-report export and produces typed rows under
//! the strict template rules: header located by markers, columns resolved by
//! exact alias match, and description columns accepted only immediately
//! after their parent column.

use serde::Serialize;

use crate::coerce::{SentinelPolicy, coerce_number, coerce_string};
use crate::error::CleanError;
use crate::grid::{CellValue, RawGrid, cell_at, row_has_content};
use crate::header::{CLEAN_MARKERS, HeaderRow, locate_header};

/// Rows scanned while looking for the clean-template header.
pub const CLEAN_SCAN_WINDOW: usize = 20;

/// One fully typed, normalized record.
///
/// `desc_marca` and `desc_unidad_negocio` come from optional template
/// columns; when the column is absent the field is `None` for every row and
/// is omitted from JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRow {
    // Deduplication keys
    pub periodo_cod: Option<String>,
    pub cliente_cod: Option<String>,
    pub sucursal: Option<String>,
    // Visible fields
    pub ramo: Option<String>,
    pub desc_ramo: Option<String>,
    pub vendedor: Option<String>,
    pub desc_vendedor: Option<String>,
    pub codigo: Option<String>,
    pub desc_producto: Option<String>,
    pub marca: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc_marca: Option<String>,
    pub unidad_negocio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc_unidad_negocio: Option<String>,
    pub precio: Option<f64>,
    pub bonific: Option<f64>,
    pub pr_neto: Option<f64>,
    pub cant_totales: Option<f64>,
    pub importes_netos: Option<f64>,
    pub importes_finales: Option<f64>,
}

/// Extraction result: typed rows plus the physical row count below the
/// header (blank rows included), for reporting.
#[derive(Debug, Serialize)]
pub struct CleanDataset {
    pub rows: Vec<CleanRow>,
    pub total_raw: usize,
}

/// Column header labels for re-serializing a clean dataset to a sheet.
pub const CLEAN_HEADERS: [&str; 19] = [
    "Cod. Período",
    "Cod. Cliente",
    "Sucursal",
    "Ramo",
    "Descripción Ramo",
    "Vendedor",
    "Descripción Vendedor",
    "Código",
    "Descripción",
    "Marca",
    "Descripción Marca",
    "Unidad de Negocio",
    "Descripción UN",
    "Precio",
    "Bonific.",
    "Pr Neto",
    "Cantidades Totales",
    "Importes Netos",
    "Importes Finales",
];

/// Resolved column positions for the clean template.
struct CleanColumns {
    periodo_cod: Option<usize>,
    cliente_cod: Option<usize>,
    sucursal: Option<usize>,
    ramo: Option<usize>,
    desc_ramo: Option<usize>,
    vendedor: Option<usize>,
    desc_vendedor: Option<usize>,
    codigo: usize,
    desc_producto: usize,
    marca: Option<usize>,
    desc_marca: Option<usize>,
    unidad_negocio: Option<usize>,
    desc_unidad_negocio: Option<usize>,
    precio: usize,
    bonific: Option<usize>,
    pr_neto: Option<usize>,
    cant_totales: Option<usize>,
    importes_netos: Option<usize>,
    importes_finales: Option<usize>,
}

fn resolve_columns(header: &HeaderRow) -> Result<CleanColumns, CleanError> {
    let codigo = header.find_exact(&["código", "codigo"]);
    let precio = header.find_exact(&["precio"]);

    let (Some(codigo), Some(precio)) = (codigo, precio) else {
        return Err(CleanError::MissingRequiredColumn("Código/Precio"));
    };

    // Strict rule: the product description must sit right after Código.
    let desc_producto = header
        .description_after(codigo)
        .ok_or(CleanError::MissingRequiredColumn("Descripción"))?;

    let marca = header.find_exact(&["marca"]);
    let unidad_negocio = header.find_exact(&["unidad de negocio"]);

    Ok(CleanColumns {
        periodo_cod: header.find_exact(&["cod. período", "cod. periodo", "cod periodo"]),
        cliente_cod: header.find_exact(&["cod. cliente", "cod cliente"]),
        sucursal: header.find_exact(&["sucursal"]),
        ramo: header.find_exact(&["ramo"]),
        desc_ramo: header.find_exact(&["descripción ramo", "descripcion ramo"]),
        vendedor: header.find_exact(&["vendedor"]),
        desc_vendedor: header.find_exact(&["descripción vendedor", "descripcion vendedor"]),
        codigo,
        desc_producto,
        marca,
        desc_marca: marca.and_then(|idx| header.description_after(idx)),
        unidad_negocio,
        desc_unidad_negocio: unidad_negocio.and_then(|idx| header.description_after(idx)),
        precio,
        // Appears as both "Bonific" and "Bonific."
        bonific: header.find_prefix("bonific"),
        pr_neto: header.find_exact(&["pr neto", "pr. neto", "precio neto"]),
        cant_totales: header.find_exact(&["cantidades totales", "cant. totales"]),
        importes_netos: header.find_exact(&["importes netos", "imp. netos"]),
        importes_finales: header.find_exact(&["importes finales", "imp. finales"]),
    })
}

impl CleanColumns {
    fn extract(&self, row: &[CellValue]) -> CleanRow {
        let string = |idx: Option<usize>| coerce_string(cell_at(row, idx));
        let number = |idx: Option<usize>| coerce_number(cell_at(row, idx), SentinelPolicy::Strict);

        CleanRow {
            periodo_cod: string(self.periodo_cod),
            cliente_cod: string(self.cliente_cod),
            sucursal: string(self.sucursal),
            ramo: string(self.ramo),
            desc_ramo: string(self.desc_ramo),
            vendedor: string(self.vendedor),
            desc_vendedor: string(self.desc_vendedor),
            codigo: string(Some(self.codigo)),
            desc_producto: string(Some(self.desc_producto)),
            marca: string(self.marca),
            desc_marca: string(self.desc_marca),
            unidad_negocio: string(self.unidad_negocio),
            desc_unidad_negocio: string(self.desc_unidad_negocio),
            precio: number(Some(self.precio)),
            bonific: number(self.bonific),
            pr_neto: number(self.pr_neto),
            cant_totales: number(self.cant_totales),
            importes_netos: number(self.importes_netos),
            importes_finales: number(self.importes_finales),
        }
    }
}

/// Extract the clean dataset from a raw grid.
pub fn extract_clean_dataset(grid: &RawGrid) -> Result<CleanDataset, CleanError> {
    if grid.is_empty() {
        return Err(CleanError::EmptyGrid);
    }

    let header = locate_header(grid, &CLEAN_MARKERS, CLEAN_SCAN_WINDOW)
        .map_err(|_| CleanError::HeaderNotFound)?;
    let columns = resolve_columns(&header)?;

    let data_rows = &grid[header.index + 1..];
    let rows = data_rows
        .iter()
        .filter(|row| row_has_content(row))
        .map(|row| columns.extract(row))
        .collect();

    Ok(CleanDataset {
        rows,
        total_raw: data_rows.len(),
    })
}

impl CleanDataset {
    /// Shape the dataset as an output grid (header row first) for
    /// re-serialization to a spreadsheet.
    pub fn to_output_grid(&self) -> RawGrid {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(
            CLEAN_HEADERS
                .iter()
                .map(|h| CellValue::Text((*h).to_string()))
                .collect(),
        );

        let text = |v: &Option<String>| {
            v.as_ref()
                .map(|s| CellValue::Text(s.clone()))
                .unwrap_or(CellValue::Blank)
        };
        let num = |v: &Option<f64>| v.map(CellValue::Number).unwrap_or(CellValue::Blank);

        for row in &self.rows {
            grid.push(vec![
                text(&row.periodo_cod),
                text(&row.cliente_cod),
                text(&row.sucursal),
                text(&row.ramo),
                text(&row.desc_ramo),
                text(&row.vendedor),
                text(&row.desc_vendedor),
                text(&row.codigo),
                text(&row.desc_producto),
                text(&row.marca),
                text(&row.desc_marca),
                text(&row.unidad_negocio),
                text(&row.desc_unidad_negocio),
                num(&row.precio),
                num(&row.bonific),
                num(&row.pr_neto),
                num(&row.cant_totales),
                num(&row.importes_netos),
                num(&row.importes_finales),
            ]);
        }

        grid
    }
}
