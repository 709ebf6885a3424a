//! Interactive numbered-menu front end.
//!
//! A [`Session`] reads choices line by line from any [`BufRead`] and
//! writes prompts and results to any [`Write`], so the same loop serves a
//! terminal and the tests. Ledger failures are printed and the loop goes
//! on; only I/O errors end a session early. End of input behaves like
//! choosing "Exit".

use core::str::FromStr;
use std::io::{self, BufRead, Write};

use crate::error::{LedgerError, Result};
use crate::models::{DiscountRate, ShopperId, ShopperKind};
use crate::platform::ShoppingPlatform;

/// Menu text printed before every choice.
const MENU: &str = "\
Select an option:
1. Create Premium Shopper account
2. Create Basic Shopper account
3. Make a purchase
4. Add rewards points (Premium Shopper)
5. Use discount coupon (Basic Shopper)
6. Check individual shopper's total spending
7. Check total spending across all shoppers
8. Refund an item
9. Remove a shopper
10. Exit";

/// One entry of the numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    /// 1
    CreatePremium,
    /// 2
    CreateBasic,
    /// 3
    Purchase,
    /// 4
    AddRewardsPoints,
    /// 5
    UseDiscountCoupon,
    /// 6
    CheckShopperSpending,
    /// 7
    CheckTotalSpending,
    /// 8
    Refund,
    /// 9
    RemoveShopper,
    /// 10
    Exit,
}

impl FromStr for MenuChoice {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let number: u8 = s
            .trim()
            .parse()
            .map_err(|err| LedgerError::InvalidInput(format!("menu choice: {err}")))?;
        match number {
            1 => Ok(Self::CreatePremium),
            2 => Ok(Self::CreateBasic),
            3 => Ok(Self::Purchase),
            4 => Ok(Self::AddRewardsPoints),
            5 => Ok(Self::UseDiscountCoupon),
            6 => Ok(Self::CheckShopperSpending),
            7 => Ok(Self::CheckTotalSpending),
            8 => Ok(Self::Refund),
            9 => Ok(Self::RemoveShopper),
            10 => Ok(Self::Exit),
            other => Err(LedgerError::InvalidInput(format!(
                "menu choice {other} is out of range"
            ))),
        }
    }
}

/// A single run of the interactive menu over one platform.
#[derive(Debug)]
pub struct Session<'platform, R, W> {
    /// Ledger being operated on.
    platform: &'platform mut ShoppingPlatform,
    /// Line source.
    input: R,
    /// Prompt and result sink.
    output: W,
}

impl<'platform, R: BufRead, W: Write> Session<'platform, R, W> {
    /// Creates a session over `platform`.
    #[inline]
    pub const fn new(platform: &'platform mut ShoppingPlatform, input: R, output: W) -> Self {
        Self {
            platform,
            input,
            output,
        }
    }

    /// Runs the menu until "Exit" is chosen or input ends.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading input or writing output.
    #[inline]
    #[tracing::instrument(skip_all, fields(platform = %self.platform.name()))]
    pub fn run(&mut self) -> io::Result<()> {
        tracing::debug!("session started");
        loop {
            writeln!(self.output, "{MENU}")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            match line.parse::<MenuChoice>() {
                Ok(MenuChoice::Exit) => break,
                Ok(choice) => self.dispatch(choice)?,
                Err(_) => writeln!(self.output, "Invalid choice!")?,
            }
        }
        tracing::debug!(shoppers = self.platform.len(), "session finished");
        Ok(())
    }

    /// Consumes the session and hands back the output sink.
    #[inline]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Routes a menu choice to its handler.
    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<()> {
        match choice {
            MenuChoice::CreatePremium => self.create_shopper(ShopperKind::Premium),
            MenuChoice::CreateBasic => self.create_shopper(ShopperKind::Basic),
            MenuChoice::Purchase => self.purchase_loop(),
            MenuChoice::AddRewardsPoints => self.rewards_loop(),
            MenuChoice::UseDiscountCoupon => self.discount_loop(),
            MenuChoice::CheckShopperSpending => self.check_shopper_spending(),
            MenuChoice::CheckTotalSpending => self.check_total_spending(),
            MenuChoice::Refund => self.refund_loop(),
            MenuChoice::RemoveShopper => self.remove_shopper(),
            MenuChoice::Exit => Ok(()),
        }
    }

    /// Menu 1 and 2.
    fn create_shopper(&mut self, kind: ShopperKind) -> io::Result<()> {
        let Some(name) = self.prompt("Enter Shopper's name:")? else {
            return Ok(());
        };
        let Some(raw_id) = self.prompt("Enter Shopper's ID:")? else {
            return Ok(());
        };
        match self.platform.create_shopper(&name, &raw_id, kind) {
            Ok(id) => writeln!(
                self.output,
                "{} Shopper account created with ID: {id}",
                kind_label(kind)
            ),
            Err(err) => self.report(&err),
        }
    }

    /// Menu 3. An unknown ID re-prompts; a blank ID leaves the loop.
    fn purchase_loop(&mut self) -> io::Result<()> {
        loop {
            let Some(id) = self.prompt_id("Enter Shopper's ID:")? else {
                return Ok(());
            };
            if let Err(err) = self.platform.shopper(&id).map(|_| ()) {
                self.report(&err)?;
                continue;
            }
            let Some(raw_amount) = self.prompt("Enter purchase amount:")? else {
                return Ok(());
            };
            let outcome = parse_amount(&raw_amount)
                .and_then(|amount| self.platform.make_purchase(&id, amount));
            match outcome {
                Ok(total) => writeln!(self.output, "Purchase successful. New spending: {total:.2}")?,
                Err(err) => self.report(&err)?,
            }
            if !self.confirm("Do you want to make another purchase? (yes/no)")? {
                return Ok(());
            }
        }
    }

    /// Menu 4. Leaves the loop if the ID is not a premium shopper.
    fn rewards_loop(&mut self) -> io::Result<()> {
        loop {
            let Some(id) = self.prompt_id("Enter Shopper's ID:")? else {
                return Ok(());
            };
            if let Err(err) = self.require_kind(&id, ShopperKind::Premium) {
                return self.report(&err);
            }
            let Some(raw_points) = self.prompt("Enter rewards points to add:")? else {
                return Ok(());
            };
            let outcome = parse_points(&raw_points)
                .and_then(|points| self.platform.add_bonus_points(&id, points));
            match outcome {
                Ok(balance) => writeln!(
                    self.output,
                    "Rewards points added. Total rewards points: {balance}"
                )?,
                Err(err) => self.report(&err)?,
            }
            if !self.confirm("Do you want to add more rewards points? (yes/no)")? {
                return Ok(());
            }
        }
    }

    /// Menu 5. Leaves the loop if the ID is not a basic shopper.
    fn discount_loop(&mut self) -> io::Result<()> {
        loop {
            let Some(id) = self.prompt_id("Enter Shopper's ID:")? else {
                return Ok(());
            };
            if let Err(err) = self.require_kind(&id, ShopperKind::Basic) {
                return self.report(&err);
            }
            let Some(raw_rate) =
                self.prompt("Enter discount coupon (as a decimal, e.g., 0.1 for 10%):")?
            else {
                return Ok(());
            };
            let outcome = parse_amount(&raw_rate)
                .and_then(DiscountRate::new)
                .and_then(|rate| self.platform.apply_discount(&id, rate).map(|()| rate));
            match outcome {
                Ok(rate) => writeln!(self.output, "Discount coupon of {rate} applied.")?,
                Err(err) => self.report(&err)?,
            }
            if !self.confirm("Do you want to apply another discount coupon? (yes/no)")? {
                return Ok(());
            }
        }
    }

    /// Menu 6.
    fn check_shopper_spending(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_id("Enter Shopper ID:")? else {
            return Ok(());
        };
        let found = self
            .platform
            .shopper(&id)
            .map(|shopper| (shopper.name().to_owned(), shopper.check_spending()));
        match found {
            Ok((name, total)) => {
                writeln!(self.output, "{name} has spent a total of {total:.2}")
            }
            Err(err) => self.report(&err),
        }
    }

    /// Menu 7.
    fn check_total_spending(&mut self) -> io::Result<()> {
        let total = self.platform.total_platform_spending();
        writeln!(
            self.output,
            "Total spending across all shoppers: {total:.2}"
        )
    }

    /// Menu 8. Leaves the loop on an unknown ID.
    fn refund_loop(&mut self) -> io::Result<()> {
        loop {
            let Some(id) = self.prompt_id("Enter Shopper's ID:")? else {
                return Ok(());
            };
            if let Err(err) = self.platform.shopper(&id).map(|_| ()) {
                return self.report(&err);
            }
            let Some(raw_amount) = self.prompt("Enter refund amount:")? else {
                return Ok(());
            };
            let outcome = parse_amount(&raw_amount)
                .and_then(|amount| self.platform.refund(&id, amount));
            match outcome {
                Ok(total) => writeln!(self.output, "Refund successful. New spending: {total:.2}")?,
                Err(err) => self.report(&err)?,
            }
            if !self.confirm("Do you want to refund another item? (yes/no)")? {
                return Ok(());
            }
        }
    }

    /// Menu 9.
    fn remove_shopper(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_id("Enter Shopper's ID to remove:")? else {
            return writeln!(self.output, "Invalid shopper ID.");
        };
        let removed = self.platform.remove_shopper(&id).map(drop);
        match removed {
            Ok(()) => writeln!(self.output, "Shopper with ID {id} has been removed."),
            Err(err) => self.report(&err),
        }
    }

    /// Checks that `id` names a shopper of kind `expected`.
    fn require_kind(&self, id: &ShopperId, expected: ShopperKind) -> Result<()> {
        self.platform.shopper_of_kind(id, expected).map(|_| ())
    }

    /// Prints a ledger error as a user-facing message.
    fn report(&mut self, err: &LedgerError) -> io::Result<()> {
        tracing::debug!(error = %err, "operation rejected");
        writeln!(self.output, "{}", describe(err))
    }

    /// Asks a yes/no question; only "yes" (any case) counts as yes.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self
            .prompt(question)?
            .is_some_and(|answer| answer.trim().eq_ignore_ascii_case("yes")))
    }

    /// Prompts for a shopper ID; `None` on end of input or a blank line.
    fn prompt_id(&mut self, message: &str) -> io::Result<Option<ShopperId>> {
        Ok(self
            .prompt(message)?
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .map(ShopperId::new))
    }

    /// Prints `message` and reads the answer.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Reads one line without its terminator; `None` at end of input.
    ///
    /// Bytes that are not valid UTF-8 become U+FFFD, so a garbled line is
    /// rejected by whoever parses it instead of ending the session.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        let read = self.input.read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(
            String::from_utf8_lossy(&buf)
                .trim_end_matches(['\r', '\n'])
                .to_owned(),
        ))
    }
}

/// Capitalized kind name used in confirmations.
const fn kind_label(kind: ShopperKind) -> &'static str {
    match kind {
        ShopperKind::Basic => "Basic",
        ShopperKind::Premium => "Premium",
    }
}

/// User-facing text for a ledger error.
#[allow(
    clippy::pattern_type_mismatch,
    reason = "binds through the borrow since ref patterns are denied"
)]
fn describe(err: &LedgerError) -> String {
    match err {
        LedgerError::NotFound { id } => format!("Shopper with ID {id} not found."),
        LedgerError::WrongVariant { id, expected, .. } => format!(
            "Shopper with ID {id} is not a {} Shopper.",
            kind_label(*expected)
        ),
        LedgerError::InvalidInput(reason) => format!("Invalid input: {reason}."),
        LedgerError::RefundExceedsSpending { .. } => {
            "Refund amount exceeds total spending.".to_owned()
        }
        LedgerError::Serialization(inner) => format!("Error: {inner}"),
    }
}

/// Parses a decimal amount typed by the user.
fn parse_amount(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .map_err(|err| LedgerError::InvalidInput(format!("'{trimmed}' is not a number ({err})")))
}

/// Parses a whole, non-negative points value typed by the user.
fn parse_points(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    trimmed.parse::<u64>().map_err(|err| {
        LedgerError::InvalidInput(format!("'{trimmed}' is not a whole number of points ({err})"))
    })
}
