use anyhow::Result;
use chrono::Local;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_stream::{wrappers::LinesStream, StreamExt};
use tracing::info;

use crate::banking::{
  parse_amount, AccountNumber, AccountNumberGenerator, AccountStore, AccountsRepository,
  BankingError, Clock, Field,
};

/// Days of history offered by the transaction history menu
const HISTORY_WINDOWS: [(&str, u32); 3] = [("a", 7), ("b", 30), ("c", 90)];

#[derive(Debug, Error)]
#[error("Input closed")]
struct InputClosed;

/// Interactive console over an [`AccountStore`].
///
/// It reads one answer per line from `input` and writes menus and results to `output`.
/// Invalid answers are asked again, errors from the store are shown to the user,
/// except for storage errors which end the session.
/// Closing the input ends the session successfully.
pub async fn run<I, O, R, C, G>(input: I, output: O, store: &mut AccountStore<R, C, G>) -> Result<()>
where
  I: AsyncBufRead + Unpin,
  O: AsyncWrite + Unpin,
  R: AccountsRepository,
  C: Clock,
  G: AccountNumberGenerator,
{
  let mut console = Console::new(input, output);
  match main_menu(&mut console, store).await {
    Err(err) if err.is::<InputClosed>() => Ok(()),
    result => result,
  }
}

async fn main_menu<I, O, R, C, G>(
  console: &mut Console<I, O>,
  store: &mut AccountStore<R, C, G>,
) -> Result<()>
where
  I: AsyncBufRead + Unpin,
  O: AsyncWrite + Unpin,
  R: AccountsRepository,
  C: Clock,
  G: AccountNumberGenerator,
{
  loop {
    console
      .print("\n===== WELCOME TO THE BANKING SYSTEM =====\n1. Register\n2. Login\n3. Exit")
      .await?;

    match console.prompt("Choose an option: ").await?.as_str() {
      "1" => register(console, store).await?,
      "2" => {
        if let Some(account_number) = login(console, store).await? {
          account_menu(console, store, account_number).await?;
        }
      }
      "3" => {
        console.print("Goodbye!").await?;
        return Ok(());
      }
      _ => console.print("Invalid option.").await?,
    }
  }
}

async fn register<I, O, R, C, G>(
  console: &mut Console<I, O>,
  store: &mut AccountStore<R, C, G>,
) -> Result<()>
where
  I: AsyncBufRead + Unpin,
  O: AsyncWrite + Unpin,
  R: AccountsRepository,
  C: Clock,
  G: AccountNumberGenerator,
{
  let rules = store.rules().clone();

  let first_name = console
    .ask_until(
      "Enter your first name (UPPERCASE): ",
      "Invalid first name. Only uppercase letters.",
      |answer| rules.check_name(Field::FirstName, answer),
    )
    .await?;
  let last_name = console
    .ask_until(
      "Enter your last name (UPPERCASE): ",
      "Invalid last name. Only uppercase letters.",
      |answer| rules.check_name(Field::LastName, answer),
    )
    .await?;
  let phone = console
    .ask_until(
      "Enter your phone number (10 digits): ",
      "Invalid phone number.",
      |answer| rules.check_phone(answer),
    )
    .await?;
  let email_question = format!("Enter your email (must end with {}): ", rules.email_domain);
  let email = loop {
    let email = console
      .ask_until(&email_question, "Invalid email.", |answer| {
        rules.check_email(answer)
      })
      .await?;
    if !store.email_registered(&email) {
      break email;
    }
    console.print("Email already exists.").await?;
  };
  let password_question = format!(
    "Enter password (min {} characters): ",
    rules.password_len()
  );
  let password = loop {
    let password = console.read_line(&password_question).await?;
    if rules.check_password(&password).is_ok() {
      break password;
    }
    console.print("Password too short.").await?;
  };

  match store
    .register(&first_name, &last_name, &phone, &email, &password)
    .await
  {
    Ok(account) => {
      info!(account_number = account.account_number, "Account registered");
      console
        .print(&format!(
          "Registration successful! Your account number is {}",
          account.account_number
        ))
        .await
    }
    Err(err) => console.print(&describe(err)?).await,
  }
}

async fn login<I, O, R, C, G>(
  console: &mut Console<I, O>,
  store: &AccountStore<R, C, G>,
) -> Result<Option<AccountNumber>>
where
  I: AsyncBufRead + Unpin,
  O: AsyncWrite + Unpin,
  R: AccountsRepository,
  C: Clock,
  G: AccountNumberGenerator,
{
  let email = console.prompt("Enter your email: ").await?;
  let password = console.read_line("Enter your password: ").await?;

  match store
    .authenticate(&email, &password)
    .and_then(|account_number| store.get_account(account_number))
  {
    Ok(account) => {
      info!(account_number = account.account_number, "Logged in");
      console
        .print(&format!("Login successful! Welcome, {}", account.full_name()))
        .await?;
      Ok(Some(account.account_number))
    }
    Err(_) => {
      console.print("Login failed.").await?;
      Ok(None)
    }
  }
}

async fn account_menu<I, O, R, C, G>(
  console: &mut Console<I, O>,
  store: &mut AccountStore<R, C, G>,
  account_number: AccountNumber,
) -> Result<()>
where
  I: AsyncBufRead + Unpin,
  O: AsyncWrite + Unpin,
  R: AccountsRepository,
  C: Clock,
  G: AccountNumberGenerator,
{
  loop {
    console
      .print("\n1. Deposit\n2. Withdraw\n3. Show Balance\n4. Transaction History\n5. Logout")
      .await?;

    let message = match console.prompt("Choose an option: ").await?.as_str() {
      "1" => {
        let answer = console.prompt("Enter amount to deposit: ").await?;
        match parse_amount(&answer) {
          Ok(amount) => match store.deposit(account_number, amount).await {
            Ok(balance) => format!("Deposited ₹{}. New balance: ₹{}", amount, balance),
            Err(err) => describe(err)?,
          },
          Err(err) => describe(err)?,
        }
      }
      "2" => {
        let answer = console.prompt("Enter amount to withdraw: ").await?;
        match parse_amount(&answer) {
          Ok(amount) => match store.withdraw(account_number, amount).await {
            Ok(balance) => format!("Withdrew ₹{}. New balance: ₹{}", amount, balance),
            Err(err) => describe(err)?,
          },
          Err(err) => describe(err)?,
        }
      }
      "3" => match store.get_balance(account_number) {
        Ok(balance) => format!("Your current balance is: ₹{}", balance),
        Err(err) => describe(err)?,
      },
      "4" => {
        console
          .print("a. Last 7 days\nb. Last 30 days\nc. Last 90 days")
          .await?;
        let answer = console.prompt("Choose an option: ").await?;
        match HISTORY_WINDOWS.iter().find(|(key, _)| *key == answer) {
          Some((_, days)) => history(store, account_number, *days)?,
          None => "Invalid option.".to_string(),
        }
      }
      "5" => {
        info!(account_number, "Logged out");
        console.print("Logged out.").await?;
        return Ok(());
      }
      _ => "Invalid option.".to_string(),
    };

    console.print(&message).await?;
  }
}

fn history<R, C, G>(
  store: &AccountStore<R, C, G>,
  account_number: AccountNumber,
  days: u32,
) -> Result<String>
where
  R: AccountsRepository,
  C: Clock,
  G: AccountNumberGenerator,
{
  let transactions = match store.get_transactions(account_number, days) {
    Ok(transactions) => transactions,
    Err(err) => return describe(err),
  };

  let mut lines = vec![format!("\nTransactions for the last {} days:", days)];
  if transactions.is_empty() {
    lines.push("No transactions found in this period.".to_string());
  }
  for transaction in transactions {
    lines.push(format!(
      "{} - {} - ₹{}",
      transaction
        .timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S"),
      transaction.kind,
      transaction.amount
    ));
  }
  Ok(lines.join("\n"))
}

/// Message shown for an error of the store, storage errors are not recoverable.
fn describe(err: BankingError) -> Result<String> {
  Ok(match err {
    BankingError::Storage(err) => return Err(err.into()),
    BankingError::Validation(Field::Amount) => "Invalid amount. It must be a positive number.".to_string(),
    BankingError::InsufficientFunds => "Insufficient balance.".to_string(),
    BankingError::DuplicateEmail => "Email already exists.".to_string(),
    err => format!("{}.", err),
  })
}

struct Console<I, O> {
  lines: LinesStream<I>,
  output: O,
}

impl<I, O> Console<I, O>
where
  I: AsyncBufRead + Unpin,
  O: AsyncWrite + Unpin,
{
  fn new(input: I, output: O) -> Self {
    Self {
      lines: LinesStream::new(input.lines()),
      output,
    }
  }

  async fn print(&mut self, text: &str) -> Result<()> {
    self.output.write_all(text.as_bytes()).await?;
    self.output.write_all(b"\n").await?;
    self.output.flush().await?;
    Ok(())
  }

  async fn prompt(&mut self, question: &str) -> Result<String> {
    Ok(self.read_line(question).await?.trim().to_string())
  }

  /// The answer as typed, without the line terminator. Used for passwords.
  async fn read_line(&mut self, question: &str) -> Result<String> {
    self.output.write_all(question.as_bytes()).await?;
    self.output.flush().await?;
    match self.lines.next().await {
      Some(line) => Ok(line?),
      None => Err(InputClosed.into()),
    }
  }

  /// Ask until the answer passes the `check`
  async fn ask_until<F>(&mut self, question: &str, complaint: &str, check: F) -> Result<String>
  where
    F: Fn(&str) -> crate::banking::Result<()>,
  {
    loop {
      let answer = self.prompt(question).await?;
      if check(&answer).is_ok() {
        return Ok(answer);
      }
      self.print(complaint).await?;
    }
  }
}
