use crate::error::Result;
use crate::periods::calculate_financial_periods;

pub fn run(take_on: &str, year_end: &str) -> Result<()> {
    let set = calculate_financial_periods(take_on, year_end);
    println!("Current period:   {}", set.current_period);
    println!("Historic period:  {}", set.historic_period);
    println!("Bank statements:  {}", set.bank_statements);
    println!("Owner balances:   {}", set.owner_balances);
    println!("Closing balances: {}", set.closing_balances);
    Ok(())
}
