//! FFI use-case API for the Flutter inventory screens.
//!
//! # Responsibility
//! - Expose catalog, draft, item and listing use-cases as sync calls.
//! - Translate store errors into the notice text the UI shows verbatim.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Every call opens the durable store at the resolved path; no state is
//!   cached between calls except the session scope and the path itself.
//! - The session scope (edit handoff) lives for the process only.

use log::error;
use std::path::PathBuf;
use std::sync::OnceLock;
use stockbook_core::db::open_db;
use stockbook_core::listing::{parse_entry_limit, DEFAULT_VISIBLE_ROWS, EMPTY_TABLE_NOTICE};
use stockbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Category,
    ColumnVisibility, ErrorKind, ImageUpload, InventoryService, Item, ItemDraft, MemoryStorage,
    SqliteStorage, StoreError, StoreResult,
};

const STORE_FILE_NAME: &str = "stockbook_local_storage.sqlite3";
const STORE_PATH_ENV: &str = "STOCKBOOK_DB_PATH";
static STORE_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION_STORAGE: OnceLock<MemoryStorage> = OnceLock::new();

type FfiService<'conn> = InventoryService<SqliteStorage<'conn>, &'static MemoryStorage>;

/// Which user action an error belongs to; picks the notice wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subject {
    CatalogValue,
    StagedImei,
    ItemImei,
    ItemName,
    Other,
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling log files.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the durable store file before first use.
///
/// Returns empty string on success. Once the path is resolved (explicitly or
/// by a first store call), switching to a different path is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "store path cannot be empty".to_string();
    }
    let wanted = PathBuf::from(trimmed);
    let active = STORE_PATH.get_or_init(|| wanted.clone());
    if *active == wanted {
        String::new()
    } else {
        format!(
            "store path already resolved to `{}`; refusing to switch to `{}`",
            active.display(),
            wanted.display()
        )
    }
}

/// Generic success/failure envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Notice text for the user; empty on silent success.
    pub message: String,
}

/// Ordered string list envelope (catalog values, IMEIs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    pub ok: bool,
    /// Current list after the call; empty on failure.
    pub values: Vec<String>,
    pub message: String,
}

/// Catalog list plus the widget text for its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogResponse {
    pub ok: bool,
    pub values: Vec<String>,
    /// Add-dialog title, e.g. `Add Storage Option`.
    pub title: String,
    /// Add-dialog input placeholder, e.g. `Storage Size`.
    pub placeholder: String,
    /// Selector text while unselected, e.g. `Select Brand`.
    pub select_prompt: String,
    pub message: String,
}

/// Pending image envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResponse {
    pub ok: bool,
    /// Data URL of the pending image, `None` shows the placeholder.
    pub data_url: Option<String>,
    pub message: String,
}

/// Form fields of the add-items page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraftInput {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub storage: String,
    pub ram: String,
    pub distributor: String,
    pub dealer: String,
    pub agent: String,
    pub distributor_price: String,
    pub dealer_price: String,
    pub agent_price: String,
    pub tax: String,
    pub mrp_price: String,
    pub purchase_price: String,
}

/// Result of committing the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResponse {
    pub ok: bool,
    pub index: Option<u32>,
    pub item_id: Option<String>,
    pub message: String,
}

/// Flat view of a saved item for the edit page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub index: u32,
    pub item_id: String,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub storage: String,
    pub ram: String,
    pub distributor: String,
    pub dealer: String,
    pub agent: String,
    pub distributor_price: String,
    pub dealer_price: String,
    pub agent_price: String,
    pub tax: String,
    pub mrp_price: String,
    pub purchase_price: String,
    pub imeis: Vec<String>,
    pub image: Option<String>,
    /// RFC 3339 creation timestamp.
    pub date_created: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResponse {
    pub ok: bool,
    pub item: Option<ItemView>,
    pub message: String,
}

/// One listing row; `cells` follow `TableResponse::headers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRowView {
    pub index: u32,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableResponse {
    pub ok: bool,
    /// Headers of visible columns only.
    pub headers: Vec<String>,
    pub rows: Vec<TableRowView>,
    /// Rows matching the search before the entries limit.
    pub match_count: u32,
    pub message: String,
}

impl ActionResponse {
    fn from_result(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                message: String::new(),
            },
            Err(message) => Self { ok: false, message },
        }
    }
}

impl ListResponse {
    fn from_result(result: Result<Vec<String>, String>) -> Self {
        match result {
            Ok(values) => Self {
                ok: true,
                values,
                message: String::new(),
            },
            Err(message) => Self {
                ok: false,
                values: Vec::new(),
                message,
            },
        }
    }
}

impl ItemResponse {
    fn from_result(result: Result<(usize, Item), String>) -> Self {
        match result {
            Ok((index, item)) => Self {
                ok: true,
                item: Some(to_item_view(index, item)),
                message: String::new(),
            },
            Err(message) => Self {
                ok: false,
                item: None,
                message,
            },
        }
    }
}

/// Lists values of one category with its widget text.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_list(category: String) -> CatalogResponse {
    catalog_response(&category, |service, category| {
        service.catalog().list(category)
    })
}

/// Adds a value to a category. Duplicate and blank values are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_add(category: String, value: String) -> CatalogResponse {
    catalog_response(&category, |service, category| {
        service.catalog().add(category, &value)
    })
}

/// Removes the value at `index` from a category.
#[flutter_rust_bridge::frb(sync)]
pub fn catalog_remove(category: String, index: u32) -> CatalogResponse {
    catalog_response(&category, |service, category| {
        service.catalog().remove(category, index as usize)
    })
}

/// Stages an IMEI for the draft; `message` carries the `Qty: N` label.
#[flutter_rust_bridge::frb(sync)]
pub fn staging_imei_add(value: String) -> ListResponse {
    staged_imeis_response(with_service(Subject::StagedImei, |service| {
        service.imeis().add(&value)?;
        service.imeis().list()
    }))
}

#[flutter_rust_bridge::frb(sync)]
pub fn staging_imei_remove(index: u32) -> ListResponse {
    staged_imeis_response(with_service(Subject::StagedImei, |service| {
        service.imeis().remove(index as usize)?;
        service.imeis().list()
    }))
}

#[flutter_rust_bridge::frb(sync)]
pub fn staging_imei_list() -> ListResponse {
    staged_imeis_response(with_service(Subject::StagedImei, |service| {
        service.imeis().list()
    }))
}

/// Validates and stores an uploaded image as the draft's pending image.
///
/// # FFI contract
/// - Type and size are checked before encoding; on failure the previous
///   pending image stays in place.
#[flutter_rust_bridge::frb(sync)]
pub fn image_upload(mime_type: String, bytes: Vec<u8>) -> ImageResponse {
    let result = ImageUpload::begin(&mime_type, bytes.len() as u64)
        .and_then(|upload| upload.finish(&bytes))
        .map_err(|err| notice(&err, Subject::Other))
        .and_then(|payload| {
            with_service(Subject::Other, |service| {
                service.image().apply(&payload)?;
                Ok(payload.into_data_url())
            })
        });
    match result {
        Ok(data_url) => ImageResponse {
            ok: true,
            data_url: Some(data_url),
            message: String::new(),
        },
        Err(message) => ImageResponse {
            ok: false,
            data_url: None,
            message,
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn image_get() -> ImageResponse {
    match with_service(Subject::Other, |service| service.image().get()) {
        Ok(data_url) => ImageResponse {
            ok: true,
            data_url,
            message: String::new(),
        },
        Err(message) => ImageResponse {
            ok: false,
            data_url: None,
            message,
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn image_clear() -> ActionResponse {
    ActionResponse::from_result(
        with_service(Subject::Other, |service| service.image().clear()),
    )
}

/// Commits the draft with the staged IMEIs and pending image.
///
/// # FFI contract
/// - On success staging state is cleared and the UI should reset its form.
/// - On failure nothing changes.
#[flutter_rust_bridge::frb(sync)]
pub fn item_save(draft: ItemDraftInput) -> SaveResponse {
    if draft.name.trim().is_empty() {
        return SaveResponse {
            ok: false,
            index: None,
            item_id: None,
            message: notice(
                &StoreError::Validation("item name cannot be empty".to_string()),
                Subject::ItemName,
            ),
        };
    }

    let mut draft = to_item_draft(draft);
    let result = with_service(Subject::Other, |service| {
        let index = service.save(&mut draft)?;
        let item = service.items().get(index)?;
        Ok((index, item.id))
    });
    match result {
        Ok((index, item_id)) => SaveResponse {
            ok: true,
            index: Some(to_u32(index)),
            item_id: Some(item_id.to_string()),
            message: "Item saved successfully!".to_string(),
        },
        Err(message) => SaveResponse {
            ok: false,
            index: None,
            item_id: None,
            message,
        },
    }
}

/// Builds the listing table.
///
/// # FFI contract
/// - `search`: case-insensitive text; empty shows everything.
/// - `limit`: entries shown; `None` uses the default of 30, `Some(0)` fails.
/// - `hidden_columns`: column headers to hide (`Date Created`, `date_created`).
#[flutter_rust_bridge::frb(sync)]
pub fn items_table(search: String, limit: Option<u32>, hidden_columns: Vec<String>) -> TableResponse {
    let result = (|| -> Result<TableResponse, String> {
        let limit = match limit {
            Some(value) => {
                parse_entry_limit(&value.to_string()).map_err(|err| notice(&err, Subject::Other))?
            }
            None => DEFAULT_VISIBLE_ROWS,
        };
        let mut visibility = ColumnVisibility::new();
        for name in &hidden_columns {
            visibility
                .set_visible_named(name, false)
                .map_err(|err| notice(&err, Subject::Other))?;
        }

        let table = with_service(Subject::Other, |service| service.table())?;
        let headers = visibility
            .visible_columns()
            .into_iter()
            .map(|column| column.header().to_string())
            .collect();
        let match_count = table.search(&search).len();
        let rows = table
            .view(&search, limit)
            .into_iter()
            .map(|row| TableRowView {
                index: to_u32(row.index),
                cells: row
                    .visible_cells(&visibility)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect::<Vec<_>>();
        let message = if table.is_empty() {
            EMPTY_TABLE_NOTICE.to_string()
        } else {
            String::new()
        };
        Ok(TableResponse {
            ok: true,
            headers,
            rows,
            match_count: to_u32(match_count),
            message,
        })
    })();

    result.unwrap_or_else(|message| TableResponse {
        ok: false,
        headers: Vec::new(),
        rows: Vec::new(),
        match_count: 0,
        message,
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn item_get(index: u32) -> ItemResponse {
    let index = index as usize;
    ItemResponse::from_result(with_service(Subject::Other, |service| {
        Ok((index, service.items().get(index)?))
    }))
}

/// Replaces one field of a saved item (`name`, `brand`, `mrpPrice`, ...).
#[flutter_rust_bridge::frb(sync)]
pub fn item_update_field(index: u32, field: String, value: String) -> ItemResponse {
    let index = index as usize;
    let subject = if field == "name" {
        Subject::ItemName
    } else {
        Subject::Other
    };
    ItemResponse::from_result(with_service(subject, |service| {
        Ok((index, service.items().update_field(index, &field, &value)?))
    }))
}

#[flutter_rust_bridge::frb(sync)]
pub fn item_imei_add(index: u32, value: String) -> ListResponse {
    ListResponse::from_result(with_service(Subject::ItemImei, |service| {
        service.items().add_imei(index as usize, &value)
    }))
}

#[flutter_rust_bridge::frb(sync)]
pub fn item_imei_remove(index: u32, imei_index: u32) -> ListResponse {
    ListResponse::from_result(with_service(Subject::ItemImei, |service| {
        service
            .items()
            .remove_imei(index as usize, imei_index as usize)
    }))
}

/// Records the row to open on the edit page.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_begin(index: u32) -> ActionResponse {
    ActionResponse::from_result(
        with_service(Subject::Other, |service| service.begin_edit(index as usize)),
    )
}

/// Loads the row recorded by `edit_begin`.
///
/// Fails with a notice when no row was recorded or the row is gone.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_target() -> ItemResponse {
    ItemResponse::from_result(
        with_service(Subject::Other, |service| service.edit_target()).and_then(|target| {
            target.ok_or_else(|| "No item selected for editing.".to_string())
        }),
    )
}

fn catalog_response(
    category_name: &str,
    f: impl FnOnce(&FfiService<'_>, Category) -> StoreResult<Vec<String>>,
) -> CatalogResponse {
    let category = match category_name.parse::<Category>() {
        Ok(category) => category,
        Err(err) => {
            return CatalogResponse {
                ok: false,
                values: Vec::new(),
                title: String::new(),
                placeholder: String::new(),
                select_prompt: String::new(),
                message: notice(&err, Subject::CatalogValue),
            };
        }
    };

    let (ok, values, message) =
        match with_service(Subject::CatalogValue, |service| f(service, category)) {
            Ok(values) => (true, values, String::new()),
            Err(message) => (false, Vec::new(), message),
        };
    CatalogResponse {
        ok,
        values,
        title: category.dialog_title().to_string(),
        placeholder: category.placeholder().to_string(),
        select_prompt: category.select_prompt(),
        message,
    }
}

fn staged_imeis_response(result: Result<Vec<String>, String>) -> ListResponse {
    match result {
        Ok(values) => ListResponse {
            ok: true,
            message: format!("Qty: {}", values.len()),
            values,
        },
        Err(message) => ListResponse::from_result(Err(message)),
    }
}

fn resolve_store_path() -> PathBuf {
    STORE_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_FILE_NAME)
        })
        .clone()
}

fn session_storage() -> &'static MemoryStorage {
    SESSION_STORAGE.get_or_init(MemoryStorage::new)
}

fn with_service<T>(
    subject: Subject,
    f: impl FnOnce(&FfiService<'_>) -> StoreResult<T>,
) -> Result<T, String> {
    let run = || -> StoreResult<T> {
        let conn = open_db(resolve_store_path())?;
        let service = InventoryService::with_session(SqliteStorage::new(&conn), session_storage());
        service.initialize()?;
        f(&service)
    };
    run().map_err(|err| {
        if matches!(err.kind(), ErrorKind::Storage | ErrorKind::InvalidData) {
            error!(
                "event=ffi_call module=ffi status=error error_kind={:?} error={}",
                err.kind(),
                err
            );
        }
        notice(&err, subject)
    })
}

/// User-visible notice for a rejected action.
fn notice(err: &StoreError, subject: Subject) -> String {
    match (err.kind(), subject) {
        (ErrorKind::Validation, Subject::CatalogValue) => "Please enter a value".to_string(),
        (ErrorKind::Validation, Subject::StagedImei | Subject::ItemImei) => {
            "Please enter an IMEI number".to_string()
        }
        (ErrorKind::Validation, Subject::ItemName) => "Please enter item name".to_string(),
        (ErrorKind::Duplicate, Subject::CatalogValue) => "This item already exists".to_string(),
        (ErrorKind::Duplicate, Subject::StagedImei) => "This IMEI already exists".to_string(),
        (ErrorKind::Duplicate, Subject::ItemImei) => {
            "This IMEI already exists for this item".to_string()
        }
        (ErrorKind::UnsupportedType, _) => {
            "Please upload a valid image file (JPG, PNG, GIF, or SVG)".to_string()
        }
        (ErrorKind::TooLarge, _) => "File size should be less than 5MB".to_string(),
        _ => err.to_string(),
    }
}

fn to_item_draft(input: ItemDraftInput) -> ItemDraft {
    ItemDraft {
        name: input.name,
        description: input.description,
        brand: input.brand,
        model: input.model,
        color: input.color,
        storage: input.storage,
        ram: input.ram,
        distributor: input.distributor,
        dealer: input.dealer,
        agent: input.agent,
        distributor_price: input.distributor_price,
        dealer_price: input.dealer_price,
        agent_price: input.agent_price,
        tax: input.tax,
        mrp_price: input.mrp_price,
        purchase_price: input.purchase_price,
    }
}

fn to_item_view(index: usize, item: Item) -> ItemView {
    ItemView {
        index: to_u32(index),
        item_id: item.id.to_string(),
        name: item.name,
        description: item.description,
        brand: item.brand,
        model: item.model,
        color: item.color,
        storage: item.storage,
        ram: item.ram,
        distributor: item.distributor,
        dealer: item.dealer,
        agent: item.agent,
        distributor_price: item.distributor_price,
        dealer_price: item.dealer_price,
        agent_price: item.agent_price,
        tax: item.tax,
        mrp_price: item.mrp_price,
        purchase_price: item.purchase_price,
        imeis: item.imeis,
        image: item.image,
        date_created: item.date_created.to_rfc3339(),
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
