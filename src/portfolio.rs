// =============================================================================
// Portfolio — cash wallet plus one-share-at-a-time holdings
// =============================================================================
//
// Buy:  wallet >= price  -> wallet -= price, quantity += 1,
//       buy_price = round((buy_price * qty + price) / (qty + 1))
// Sell: holding exists   -> wallet += price, quantity -= 1 (removed at 0),
//       realized = price - buy_price
//
// Valuation uses the live quote when one is known and the average buy price
// otherwise.
// =============================================================================

use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::advice::{trade_explanation, League};

/// Cash every new player starts with.
pub const STARTING_CASH: f64 = 100_000.0;

/// Shares of one stock held by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub quantity: u32,
    /// Average cost per share, rounded to whole rupees.
    pub buy_price: f64,
}

/// Result of a completed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub symbol: String,
    pub price: f64,
    pub realized_pnl: f64,
    pub explanation: String,
}

/// Point-in-time valuation of the whole portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub wallet: f64,
    pub holdings_value: f64,
    pub total_value: f64,
    pub overall_pnl: f64,
    pub league: League,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub wallet: f64,
    pub starting_cash: f64,
    pub holdings: Vec<Holding>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new(STARTING_CASH)
    }
}

impl Portfolio {
    pub fn new(starting_cash: f64) -> Self {
        Self {
            wallet: starting_cash,
            starting_cash,
            holdings: Vec::new(),
        }
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.symbol == symbol)
    }

    /// Buy one share of `symbol` at `price`.
    pub fn buy(&mut self, symbol: &str, name: &str, price: f64) -> Result<&Holding> {
        if !price.is_finite() || price <= 0.0 {
            bail!("invalid price {price} for {symbol}");
        }
        if self.wallet < price {
            bail!(
                "insufficient funds: wallet {:.2} < price {:.2} for {symbol}",
                self.wallet,
                price
            );
        }

        self.wallet -= price;

        let idx = match self.holdings.iter().position(|h| h.symbol == symbol) {
            Some(idx) => {
                let h = &mut self.holdings[idx];
                let qty = f64::from(h.quantity);
                h.buy_price = ((h.buy_price * qty + price) / (qty + 1.0)).round();
                h.quantity += 1;
                idx
            }
            None => {
                self.holdings.push(Holding {
                    symbol: symbol.to_string(),
                    name: name.to_string(),
                    quantity: 1,
                    buy_price: price,
                });
                self.holdings.len() - 1
            }
        };

        let h = &self.holdings[idx];
        info!(symbol, price, quantity = h.quantity, wallet = self.wallet, "bought one share");
        Ok(h)
    }

    /// Sell one share of `symbol` at `price`.
    pub fn sell(&mut self, symbol: &str, price: f64) -> Result<SaleReceipt> {
        if !price.is_finite() || price <= 0.0 {
            bail!("invalid price {price} for {symbol}");
        }
        let Some(idx) = self.holdings.iter().position(|h| h.symbol == symbol) else {
            bail!("no holding in {symbol} to sell");
        };

        self.wallet += price;

        let realized_pnl = price - self.holdings[idx].buy_price;
        if self.holdings[idx].quantity <= 1 {
            self.holdings.remove(idx);
        } else {
            self.holdings[idx].quantity -= 1;
        }

        info!(symbol, price, realized_pnl, wallet = self.wallet, "sold one share");

        Ok(SaleReceipt {
            symbol: symbol.to_string(),
            price,
            realized_pnl,
            explanation: trade_explanation(realized_pnl).to_string(),
        })
    }

    /// Value holdings at `quotes`, falling back to each holding's buy price.
    pub fn valuation(&self, quotes: &HashMap<String, f64>) -> Valuation {
        let holdings_value: f64 = self
            .holdings
            .iter()
            .map(|h| {
                let price = quotes.get(&h.symbol).copied().unwrap_or(h.buy_price);
                price * f64::from(h.quantity)
            })
            .sum();

        let total_value = self.wallet + holdings_value;
        let overall_pnl = total_value - self.starting_cash;

        Valuation {
            wallet: self.wallet,
            holdings_value,
            total_value,
            overall_pnl,
            league: League::for_pnl(overall_pnl),
        }
    }
}
