//! # Shell Commands
//!
//! One command per input line. Every mutating command goes through the
//! session, so the shell sees exactly what a UI would.
//!
//! ```text
//! add <store> <product> <price> <name...>   AddItem (price in major units)
//! remove <product>                           RemoveItem
//! qty <product> <n>                          UpdateQuantity
//! clear                                      ClearCart
//! show                                       print cart + totals
//! json <envelope>                            dispatch a raw {type, payload}
//! checkout <name>|<phone>|<address>          print the order request
//! placed                                     order accepted → clear cart
//! help | quit
//! ```

use bazaar_core::validation::parse_price;
use bazaar_core::{CartAction, ItemDraft, Outcome, ValidationError};
use bazaar_session::config::CurrencySettings;
use bazaar_session::{
    CartSession, CheckoutError, CreateOrderRequest, GuestDetails, SessionConfig, SessionError,
};
use thiserror::Error;
use tracing::warn;

pub const HELP: &str = "\
commands:
  add <store> <product> <price> <name...>
  remove <product>
  qty <product> <n>
  clear
  show
  json <envelope>
  checkout <name>|<phone>|<address>
  placed
  help
  quit";

/// Errors surfaced to the shell user.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl ShellError {
    /// Errors that mean the input is speaking a different protocol, as
    /// opposed to a typo the user can correct.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Session(SessionError::UnknownAction(_)))
    }
}

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(CartAction),
    /// A cart action whose arguments failed validation before dispatch.
    Invalid {
        action: &'static str,
        error: ValidationError,
    },
    Json(String),
    Show,
    Checkout(GuestDetails),
    Placed,
    Help,
    Quit,
}

impl Command {
    /// Parses one line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match word {
            "add" => {
                const USAGE: &str = "add <store> <product> <price> <name...>";
                if args.len() < 4 {
                    return Err(ShellError::Usage(USAGE));
                }
                match parse_price(args[2]) {
                    Ok(price) => Command::Dispatch(CartAction::add_item(
                        ItemDraft::new(args[1], args[3..].join(" "), price),
                        args[0],
                    )),
                    Err(error) => Command::Invalid {
                        action: "ADD_ITEM",
                        error,
                    },
                }
            }
            "remove" => match args.as_slice() {
                [product] => Command::Dispatch(CartAction::remove_item(*product)),
                _ => return Err(ShellError::Usage("remove <product>")),
            },
            "qty" => match args.as_slice() {
                [product, n] => {
                    let quantity = n.parse::<f64>().unwrap_or(f64::NAN);
                    Command::Dispatch(CartAction::update_quantity(*product, quantity))
                }
                _ => return Err(ShellError::Usage("qty <product> <n>")),
            },
            "clear" => Command::Dispatch(CartAction::ClearCart),
            "show" => Command::Show,
            "json" if !rest.is_empty() => Command::Json(rest.to_string()),
            "json" => return Err(ShellError::Usage("json <envelope>")),
            "checkout" => {
                let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
                match parts.as_slice() {
                    [name, phone, address] => Command::Checkout(GuestDetails {
                        name: name.to_string(),
                        phone: phone.to_string(),
                        address: address.to_string(),
                    }),
                    _ => return Err(ShellError::Usage("checkout <name>|<phone>|<address>")),
                }
            }
            "placed" => Command::Placed,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(ShellError::Usage("unknown command, try `help`")),
        };

        Ok(Some(command))
    }

    /// Runs the command and returns what to print.
    pub fn execute(
        self,
        session: &CartSession,
        config: &SessionConfig,
    ) -> Result<String, ShellError> {
        match self {
            Command::Dispatch(action) => Ok(render_outcome(
                &session.dispatch(action),
                session,
                &config.currency,
            )),
            Command::Invalid { action, error } => {
                warn!(action, field = error.field(), error = %error, "Cart action rejected");
                Ok(render_outcome(
                    &Outcome::Rejected { error },
                    session,
                    &config.currency,
                ))
            }
            Command::Json(envelope) => {
                let outcome = session.dispatch_json(&envelope)?;
                Ok(render_outcome(&outcome, session, &config.currency))
            }
            Command::Show => Ok(serde_json::to_string_pretty(&session.response())?),
            Command::Checkout(customer) => {
                let order = CreateOrderRequest::from_cart(&session.snapshot(), customer)?;
                Ok(format!(
                    "{}\ntotal {}{}",
                    serde_json::to_string_pretty(&order)?,
                    config.currency.symbol,
                    order.total()
                ))
            }
            Command::Placed => Ok(render_outcome(
                &session.complete_checkout(),
                session,
                &config.currency,
            )),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }
}

fn render_outcome(outcome: &Outcome, session: &CartSession, currency: &CurrencySettings) -> String {
    let totals = session.totals();
    let status = match outcome {
        Outcome::Applied { .. } => "ok".to_string(),
        Outcome::NotFound { product_id } => format!("not in cart: {}", product_id),
        Outcome::Rejected { error } => format!("rejected: {}", error),
    };
    format!(
        "{} | {} line(s), {} unit(s), total {}{}",
        status, totals.item_count, totals.total_quantity, currency.symbol, totals.total
    )
}
