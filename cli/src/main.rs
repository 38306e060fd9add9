use std::fs;
use std::io::{self, Read, Write};

use clap::{Args, Parser, Subcommand};
use futures_util::StreamExt;
use reqwest::header::CONTENT_DISPOSITION;
use serde_json::{Map, Value, json};
use tickets::{TicketFormat, TicketKind};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("invalid item `{0}` (expected QTYxNAME@PRICE or QTYxMENU_ITEM_ID, optional #notes)")]
    InvalidItem(String),
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("nothing to send: pass --data or at least one --item")]
    EmptyRequest,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pos", about = "Restaurant POS API and order feed CLI")]
struct Cli {
    #[arg(long, env = "POS_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Orders(OrdersCommand),
    Menu(MenuCommand),
    Customers(CustomersCommand),
    Employees(EmployeesCommand),
    Cash(CashCommand),
    Dashboard {
        /// First local day, YYYY-MM-DD (default today).
        #[arg(long)]
        from: Option<String>,
        /// Last local day, YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,
    },
}

// =============================================================================
// ORDERS
// =============================================================================

#[derive(Args, Debug)]
struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Subcommand, Debug)]
enum OrdersSubcommand {
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        customer_id: Option<Uuid>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        limit: Option<i64>,
    },
    Show {
        order_id: Uuid,
    },
    Create(CreateOrderArgs),
    /// Replace every line of a pending order.
    Items {
        order_id: Uuid,
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    Update {
        order_id: Uuid,
        #[arg(long)]
        data: String,
    },
    Status {
        order_id: Uuid,
        status: String,
    },
    Advance {
        order_id: Uuid,
    },
    Cancel {
        order_id: Uuid,
    },
    Delete {
        order_id: Uuid,
    },
    Ticket {
        order_id: Uuid,
        #[arg(long, default_value = "receipt")]
        kind: TicketKind,
        #[arg(long, default_value = "text")]
        format: TicketFormat,
        /// File path, or - for stdout. Binary formats default to the server's file name.
        #[arg(long)]
        output: Option<String>,
    },
    /// Stream order events from the websocket feed.
    Watch {
        #[arg(long, help = "Stop after this many order events")]
        count: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct CreateOrderArgs {
    /// Raw JSON body, or - to read it from stdin. Overrides the other flags.
    #[arg(long)]
    data: Option<String>,
    #[arg(long)]
    customer_id: Option<Uuid>,
    #[arg(long)]
    customer_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long, default_value = "walk_in")]
    source: String,
    #[arg(long)]
    address: Option<String>,
    #[arg(long, default_value = "cash")]
    payment: String,
    #[arg(long)]
    notes: Option<String>,
    /// `2xEmpanada@2.50`, `1x<menu-item-uuid>`, optional `#notes` suffix.
    #[arg(long = "item")]
    items: Vec<String>,
}

// =============================================================================
// CATALOG AND BACK OFFICE
// =============================================================================

#[derive(Args, Debug)]
struct MenuCommand {
    #[command(subcommand)]
    command: MenuSubcommand,
}

#[derive(Subcommand, Debug)]
enum MenuSubcommand {
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        available: Option<bool>,
    },
    Specials,
    Categories,
    Show {
        item_id: Uuid,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        item_id: Uuid,
        #[arg(long)]
        data: String,
    },
    Delete {
        item_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct CustomersCommand {
    #[command(subcommand)]
    command: CustomersSubcommand,
}

#[derive(Subcommand, Debug)]
enum CustomersSubcommand {
    List {
        /// Search name or phone.
        #[arg(long)]
        q: Option<String>,
    },
    Show {
        customer_id: Uuid,
    },
    Orders {
        customer_id: Uuid,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        customer_id: Uuid,
        #[arg(long)]
        data: String,
    },
    Delete {
        customer_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct EmployeesCommand {
    #[command(subcommand)]
    command: EmployeesSubcommand,
}

#[derive(Subcommand, Debug)]
enum EmployeesSubcommand {
    List {
        #[arg(long)]
        active: Option<bool>,
    },
    Show {
        employee_id: Uuid,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        employee_id: Uuid,
        #[arg(long)]
        data: String,
    },
    Delete {
        employee_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct CashCommand {
    #[command(subcommand)]
    command: CashSubcommand,
}

#[derive(Subcommand, Debug)]
enum CashSubcommand {
    List,
    Current,
    Show {
        shift_id: Uuid,
    },
    Open {
        /// Opening float, e.g. 150.00
        #[arg(long)]
        amount: String,
        #[arg(long)]
        employee_id: Option<Uuid>,
        #[arg(long)]
        notes: Option<String>,
    },
    Close {
        shift_id: Uuid,
        /// Counted drawer, e.g. 1234.50
        #[arg(long)]
        counted: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Report {
        shift_id: Uuid,
        #[arg(long, default_value = "text")]
        format: TicketFormat,
        #[arg(long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Orders(orders) => run_orders(&ctx, orders).await,
        Command::Menu(menu) => run_menu(&ctx, menu).await,
        Command::Customers(customers) => run_customers(&ctx, customers).await,
        Command::Employees(employees) => run_employees(&ctx, employees).await,
        Command::Cash(cash) => run_cash(&ctx, cash).await,
        Command::Dashboard { from, to } => {
            let query = params(&[("from", from), ("to", to)]);
            let json = api_request(&ctx, reqwest::Method::GET, "/api/dashboard/summary", &query, None).await?;
            print_json(&json)
        }
    }
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", cli.base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_orders(cli: &CliContext, orders: OrdersCommand) -> Result<(), CliError> {
    use reqwest::Method;

    match orders.command {
        OrdersSubcommand::List { status, source, customer_id, from, to, limit } => {
            let query = params(&[
                ("status", status),
                ("source", source),
                ("customer_id", customer_id.map(|id| id.to_string())),
                ("from", from),
                ("to", to),
                ("limit", limit.map(|l| l.to_string())),
            ]);
            let json = api_request(cli, Method::GET, "/api/orders", &query, None).await?;
            print_json(&json)
        }
        OrdersSubcommand::Show { order_id } => {
            let json = api_request(cli, Method::GET, &format!("/api/orders/{order_id}"), &[], None).await?;
            print_json(&json)
        }
        OrdersSubcommand::Create(args) => {
            let body = create_order_body(args)?;
            let json = api_request(cli, Method::POST, "/api/orders", &[], Some(body)).await?;
            print_json(&json)
        }
        OrdersSubcommand::Items { order_id, items } => {
            let items = items.iter().map(|raw| parse_item(raw)).collect::<Result<Vec<_>, _>>()?;
            let body = json!({ "items": items });
            let path = format!("/api/orders/{order_id}/items");
            let json = api_request(cli, Method::PUT, &path, &[], Some(body)).await?;
            print_json(&json)
        }
        OrdersSubcommand::Update { order_id, data } => {
            let body = read_data(&data)?;
            let json = api_request(cli, Method::PATCH, &format!("/api/orders/{order_id}"), &[], Some(body)).await?;
            print_json(&json)
        }
        OrdersSubcommand::Status { order_id, status } => {
            let path = format!("/api/orders/{order_id}/status");
            let json = api_request(cli, Method::POST, &path, &[], Some(json!({ "status": status }))).await?;
            print_json(&json)
        }
        OrdersSubcommand::Advance { order_id } => {
            let path = format!("/api/orders/{order_id}/advance");
            let json = api_request(cli, Method::POST, &path, &[], None).await?;
            print_json(&json)
        }
        OrdersSubcommand::Cancel { order_id } => {
            let path = format!("/api/orders/{order_id}/status");
            let json = api_request(cli, Method::POST, &path, &[], Some(json!({ "status": "cancelled" }))).await?;
            print_json(&json)
        }
        OrdersSubcommand::Delete { order_id } => {
            api_request(cli, Method::DELETE, &format!("/api/orders/{order_id}"), &[], None).await?;
            println!("deleted {order_id}");
            Ok(())
        }
        OrdersSubcommand::Ticket { order_id, kind, format, output } => {
            let query = vec![("kind", kind.as_str().to_owned()), ("format", format.as_str().to_owned())];
            let path = format!("/api/orders/{order_id}/ticket");
            let (bytes, file_name) = download(cli, &path, &query).await?;
            write_document(&bytes, format, output.as_deref(), file_name.as_deref())
        }
        OrdersSubcommand::Watch { count } => watch_orders(cli, count).await,
    }
}

async fn run_menu(cli: &CliContext, menu: MenuCommand) -> Result<(), CliError> {
    use reqwest::Method;

    let json = match menu.command {
        MenuSubcommand::List { category, available } => {
            let query = params(&[("category", category), ("available", available.map(|a| a.to_string()))]);
            api_request(cli, Method::GET, "/api/menu", &query, None).await?
        }
        MenuSubcommand::Specials => api_request(cli, Method::GET, "/api/menu/specials", &[], None).await?,
        MenuSubcommand::Categories => api_request(cli, Method::GET, "/api/menu/categories", &[], None).await?,
        MenuSubcommand::Show { item_id } => {
            api_request(cli, Method::GET, &format!("/api/menu/{item_id}"), &[], None).await?
        }
        MenuSubcommand::Create { data } => {
            api_request(cli, Method::POST, "/api/menu", &[], Some(read_data(&data)?)).await?
        }
        MenuSubcommand::Update { item_id, data } => {
            api_request(cli, Method::PATCH, &format!("/api/menu/{item_id}"), &[], Some(read_data(&data)?)).await?
        }
        MenuSubcommand::Delete { item_id } => {
            api_request(cli, Method::DELETE, &format!("/api/menu/{item_id}"), &[], None).await?;
            println!("deleted {item_id}");
            return Ok(());
        }
    };
    print_json(&json)
}

async fn run_customers(cli: &CliContext, customers: CustomersCommand) -> Result<(), CliError> {
    use reqwest::Method;

    let json = match customers.command {
        CustomersSubcommand::List { q } => {
            api_request(cli, Method::GET, "/api/customers", &params(&[("q", q)]), None).await?
        }
        CustomersSubcommand::Show { customer_id } => {
            api_request(cli, Method::GET, &format!("/api/customers/{customer_id}"), &[], None).await?
        }
        CustomersSubcommand::Orders { customer_id } => {
            api_request(cli, Method::GET, &format!("/api/customers/{customer_id}/orders"), &[], None).await?
        }
        CustomersSubcommand::Create { data } => {
            api_request(cli, Method::POST, "/api/customers", &[], Some(read_data(&data)?)).await?
        }
        CustomersSubcommand::Update { customer_id, data } => {
            let path = format!("/api/customers/{customer_id}");
            api_request(cli, Method::PATCH, &path, &[], Some(read_data(&data)?)).await?
        }
        CustomersSubcommand::Delete { customer_id } => {
            api_request(cli, Method::DELETE, &format!("/api/customers/{customer_id}"), &[], None).await?;
            println!("deleted {customer_id}");
            return Ok(());
        }
    };
    print_json(&json)
}

async fn run_employees(cli: &CliContext, employees: EmployeesCommand) -> Result<(), CliError> {
    use reqwest::Method;

    let json = match employees.command {
        EmployeesSubcommand::List { active } => {
            let query = params(&[("active", active.map(|a| a.to_string()))]);
            api_request(cli, Method::GET, "/api/employees", &query, None).await?
        }
        EmployeesSubcommand::Show { employee_id } => {
            api_request(cli, Method::GET, &format!("/api/employees/{employee_id}"), &[], None).await?
        }
        EmployeesSubcommand::Create { data } => {
            api_request(cli, Method::POST, "/api/employees", &[], Some(read_data(&data)?)).await?
        }
        EmployeesSubcommand::Update { employee_id, data } => {
            let path = format!("/api/employees/{employee_id}");
            api_request(cli, Method::PATCH, &path, &[], Some(read_data(&data)?)).await?
        }
        EmployeesSubcommand::Delete { employee_id } => {
            api_request(cli, Method::DELETE, &format!("/api/employees/{employee_id}"), &[], None).await?;
            println!("deleted {employee_id}");
            return Ok(());
        }
    };
    print_json(&json)
}

async fn run_cash(cli: &CliContext, cash: CashCommand) -> Result<(), CliError> {
    use reqwest::Method;

    let json = match cash.command {
        CashSubcommand::List => api_request(cli, Method::GET, "/api/cash-register", &[], None).await?,
        CashSubcommand::Current => api_request(cli, Method::GET, "/api/cash-register/current", &[], None).await?,
        CashSubcommand::Show { shift_id } => {
            api_request(cli, Method::GET, &format!("/api/cash-register/{shift_id}"), &[], None).await?
        }
        CashSubcommand::Open { amount, employee_id, notes } => {
            let body = json!({
                "opening_cash_cents": parse_money(&amount)?,
                "employee_id": employee_id,
                "notes": notes,
            });
            api_request(cli, Method::POST, "/api/cash-register/open", &[], Some(body)).await?
        }
        CashSubcommand::Close { shift_id, counted, notes } => {
            let body = json!({ "counted_cash_cents": parse_money(&counted)?, "notes": notes });
            let path = format!("/api/cash-register/{shift_id}/close");
            api_request(cli, Method::POST, &path, &[], Some(body)).await?
        }
        CashSubcommand::Report { shift_id, format, output } => {
            let path = format!("/api/cash-register/{shift_id}/report");
            let (bytes, file_name) = download(cli, &path, &[("format", format.as_str().to_owned())]).await?;
            return write_document(&bytes, format, output.as_deref(), file_name.as_deref());
        }
    };
    print_json(&json)
}

// =============================================================================
// ORDER FEED
// =============================================================================

async fn watch_orders(cli: &CliContext, count: Option<usize>) -> Result<(), CliError> {
    let url = ws_url(&cli.base_url)?;
    let (mut stream, _) = connect_async(url)
        .await
        .map_err(|e| CliError::WsConnect(Box::new(e)))?;

    let mut seen = 0_usize;
    while let Some(msg) = stream.next().await {
        let msg = msg.map_err(|e| CliError::WsConnect(Box::new(e)))?;
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => return Err(CliError::WsClosed),
            _ => continue,
        };
        let value: Value = serde_json::from_str(text.as_str())?;
        println!("{}", serde_json::to_string(&value)?);

        let is_order_event = value
            .get("event")
            .and_then(Value::as_str)
            .is_some_and(|event| event.starts_with("order:"));
        if is_order_event {
            seen += 1;
            if count.is_some_and(|limit| seen >= limit) {
                return Ok(());
            }
        }
    }
    Err(CliError::WsClosed)
}

fn ws_url(base_url: &str) -> Result<String, CliError> {
    let base = base_url.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("http://") {
        return Ok(format!("ws://{rest}/api/orders/feed"));
    }
    if let Some(rest) = base.strip_prefix("https://") {
        return Ok(format!("wss://{rest}/api/orders/feed"));
    }
    Err(CliError::InvalidBaseUrl(base_url.to_owned()))
}

// =============================================================================
// HTTP
// =============================================================================

fn params(pairs: &[(&'static str, Option<String>)]) -> Vec<(&'static str, String)> {
    pairs
        .iter()
        .filter_map(|(key, value)| value.clone().map(|v| (*key, v)))
        .collect()
}

fn build_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    query: &[(&'static str, String)],
) -> reqwest::RequestBuilder {
    let url = format!("{}{}", cli.base_url.trim_end_matches('/'), path);
    let request = reqwest::Client::new().request(method, &url);
    if query.is_empty() { request } else { request.query(query) }
}

async fn api_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    query: &[(&'static str, String)],
    body: Option<Value>,
) -> Result<Value, CliError> {
    let request = build_request(cli, method, path, query);
    let request = if let Some(json) = body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: error_message(&value) });
    }

    Ok(value)
}

/// Fetch a binary document and the file name the server suggests.
async fn download(
    cli: &CliContext,
    path: &str,
    query: &[(&'static str, String)],
) -> Result<(Vec<u8>, Option<String>), CliError> {
    let response = build_request(cli, reqwest::Method::GET, path, query).send().await?;
    let status = response.status();
    if !status.is_success() {
        let value = response.json::<Value>().await.unwrap_or(Value::Null);
        return Err(CliError::ServerError { status: status.as_u16(), message: error_message(&value) });
    }
    let file_name = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(disposition_filename);
    Ok((response.bytes().await?.to_vec(), file_name))
}

fn error_message(value: &Value) -> String {
    match (value.get("code").and_then(Value::as_str), value.get("message").and_then(Value::as_str)) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        _ => value.to_string(),
    }
}

fn disposition_filename(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_owned())
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
}

// =============================================================================
// INPUT / OUTPUT
// =============================================================================

fn create_order_body(args: CreateOrderArgs) -> Result<Value, CliError> {
    if let Some(data) = args.data {
        return read_data(&data);
    }
    if args.items.is_empty() {
        return Err(CliError::EmptyRequest);
    }
    let items = args.items.iter().map(|raw| parse_item(raw)).collect::<Result<Vec<_>, _>>()?;
    Ok(json!({
        "customer_id": args.customer_id,
        "customer_name": args.customer_name,
        "customer_phone": args.phone,
        "source": args.source,
        "delivery_address": args.address,
        "payment_method": args.payment,
        "notes": args.notes,
        "items": items,
    }))
}

/// Parse `2xEmpanada@2.50#well done` or `1x<uuid>` into an order line body.
fn parse_item(raw: &str) -> Result<Value, CliError> {
    let invalid = || CliError::InvalidItem(raw.to_owned());
    let (line, notes) = match raw.split_once('#') {
        Some((line, notes)) => (line.trim(), Some(notes.trim()).filter(|n| !n.is_empty())),
        None => (raw.trim(), None),
    };

    let (quantity, rest) = match line.split_once(['x', 'X']) {
        Some((qty, rest)) if !qty.is_empty() && qty.chars().all(|c| c.is_ascii_digit()) => {
            (qty.parse::<i32>().map_err(|_| invalid())?, rest.trim())
        }
        _ => (1, line),
    };
    if quantity < 1 || rest.is_empty() {
        return Err(invalid());
    }

    let mut item = Map::new();
    item.insert("quantity".into(), json!(quantity));
    if let Some((name, price)) = rest.rsplit_once('@') {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }
        item.insert("name".into(), json!(name));
        item.insert("unit_price_cents".into(), json!(parse_money(price).map_err(|_| invalid())?));
    } else {
        let id = rest.parse::<Uuid>().map_err(|_| invalid())?;
        item.insert("menu_item_id".into(), json!(id));
    }
    if let Some(notes) = notes {
        item.insert("notes".into(), json!(notes));
    }
    Ok(Value::Object(item))
}

/// Parse `1234.5`, `$1,234.50` or `12` into cents. Negative amounts are rejected.
fn parse_money(raw: &str) -> Result<i64, CliError> {
    let invalid = || CliError::InvalidAmount(raw.to_owned());
    let cleaned: String = raw.trim().trim_start_matches('$').chars().filter(|c| *c != ',').collect();
    let (whole, fraction) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > 2 {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };
    whole.checked_mul(100).and_then(|w| w.checked_add(cents)).ok_or_else(invalid)
}

/// Inline JSON, `@path` for a file, or `-` for stdin.
fn read_data(data: &str) -> Result<Value, CliError> {
    let text = if data == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else if let Some(path) = data.strip_prefix('@') {
        fs::read_to_string(path)?
    } else {
        data.to_owned()
    };
    Ok(serde_json::from_str(&text)?)
}

fn write_document(
    bytes: &[u8],
    format: TicketFormat,
    output: Option<&str>,
    suggested: Option<&str>,
) -> Result<(), CliError> {
    let target = match output {
        Some(path) => path.to_owned(),
        None if format == TicketFormat::Text => "-".to_owned(),
        None => suggested.map_or_else(|| format!("ticket.{}", format.extension()), ToOwned::to_owned),
    };
    if target == "-" {
        io::stdout().write_all(bytes)?;
        return Ok(());
    }
    fs::write(&target, bytes)?;
    eprintln!("wrote {} bytes to {target}", bytes.len());
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_item_free_line_with_notes() {
        let item = parse_item("2xEmpanada de carne@2.50#bien cocida").unwrap();
        assert_eq!(
            item,
            json!({"quantity": 2, "name": "Empanada de carne", "unit_price_cents": 250, "notes": "bien cocida"})
        );
    }

    #[test]
    fn parse_item_menu_reference_defaults_quantity() {
        let id = Uuid::new_v4();
        let item = parse_item(&id.to_string()).unwrap();
        assert_eq!(item, json!({"quantity": 1, "menu_item_id": id}));

        let item = parse_item(&format!("3X{id}")).unwrap();
        assert_eq!(item["quantity"], 3);
    }

    #[test]
    fn parse_item_keeps_names_containing_x() {
        let item = parse_item("Extra queso@1").unwrap();
        assert_eq!(item["name"], "Extra queso");
        assert_eq!(item["quantity"], 1);
    }

    #[test]
    fn parse_item_rejects_garbage() {
        assert!(parse_item("0xPan@1").is_err());
        assert!(parse_item("2x@1.00").is_err());
        assert!(parse_item("not-a-uuid").is_err());
        assert!(parse_item("Pan@abc").is_err());
    }

    #[test]
    fn parse_money_accepts_common_forms() {
        assert_eq!(parse_money("12").unwrap(), 1200);
        assert_eq!(parse_money("12.5").unwrap(), 1250);
        assert_eq!(parse_money("$1,234.05").unwrap(), 123_405);
        assert_eq!(parse_money(".75").unwrap(), 75);
        assert!(parse_money("-3").is_err());
        assert!(parse_money("1.234").is_err());
        assert!(parse_money("").is_err());
    }

    #[test]
    fn ws_url_follows_scheme() {
        assert_eq!(ws_url("http://localhost:3000/").unwrap(), "ws://localhost:3000/api/orders/feed");
        assert_eq!(ws_url("https://pos.example.com").unwrap(), "wss://pos.example.com/api/orders/feed");
        assert!(ws_url("ftp://x").is_err());
    }

    #[test]
    fn disposition_filename_is_extracted_safely() {
        assert_eq!(disposition_filename("inline; filename=\"receipt-7.pdf\"").as_deref(), Some("receipt-7.pdf"));
        assert_eq!(disposition_filename("inline; filename=\"../etc/passwd\""), None);
        assert_eq!(disposition_filename("inline"), None);
    }

    #[test]
    fn error_message_prefers_code_and_message() {
        let value = json!({"code": "E_INVALID_TRANSITION", "message": "cannot move order from pending to delivered"});
        assert_eq!(error_message(&value), "E_INVALID_TRANSITION: cannot move order from pending to delivered");
        assert_eq!(error_message(&Value::Null), "null");
    }

    #[test]
    fn create_body_requires_items_without_data() {
        let args = CreateOrderArgs {
            data: None,
            customer_id: None,
            customer_name: Some("Ana".into()),
            phone: None,
            source: "walk_in".into(),
            address: None,
            payment: "cash".into(),
            notes: None,
            items: Vec::new(),
        };
        assert!(matches!(create_order_body(args), Err(CliError::EmptyRequest)));
    }

    #[test]
    fn cli_parses_ticket_flags() {
        let cli = Cli::try_parse_from([
            "pos",
            "orders",
            "ticket",
            "00000000-0000-0000-0000-000000000000",
            "--kind",
            "kitchen",
            "--format",
            "pdf",
        ])
        .unwrap();
        match cli.command {
            Command::Orders(OrdersCommand { command: OrdersSubcommand::Ticket { kind, format, .. } }) => {
                assert_eq!(kind, TicketKind::Kitchen);
                assert_eq!(format, TicketFormat::Pdf);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
