use anyhow::{Context, Result, anyhow};
use bank_ledger::engine::{Bank, BankError, Command, Customer, InputRecord, PolicyConfig};
use csv::Trim;
use simple_logger::SimpleLogger;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::{env, fs::File};

fn main() -> Result<()> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()?;

    log::debug!("Application started");

    let policy = PolicyConfig::from_env().context("reading policy from environment")?;
    log::debug!("Policy: {policy:?}");

    log::debug!("Commands processing: Starting");
    let bank = process_commands(policy)?;
    log::debug!("Commands processing: Done");

    log::debug!("Exporting account snapshots to stdout: Started");
    write_to_std_out(&bank)?;
    log::debug!("Exporting account snapshots to stdout: Done");

    log::debug!("Application finished");

    Ok(())
}

fn get_first_arg() -> Result<PathBuf> {
    env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("expected 1 argument, but got none"))
}

fn process_commands(policy: PolicyConfig) -> Result<Bank> {
    let path = get_first_arg()?;
    log::debug!("Extracted filepath fom args: {path:?}");

    process_commands_from_filepath(&path, policy)
}

/// Customers are keyed by owner name for the length of one run.
struct Session {
    bank: Bank,
    customers: HashMap<String, Rc<Customer>>,
}

impl Session {
    fn apply(&mut self, command: Command) -> Result<(), BankError> {
        match command {
            Command::Open {
                owner,
                category,
                kind,
                initial_deposit,
                profile,
            } => match self.customers.get(&owner) {
                Some(customer) => {
                    if customer.category() != category {
                        log::warn!(
                            "{owner} is already registered as {}, ignoring {category}",
                            customer.category()
                        );
                    }
                    self.bank.open_account(customer, kind, initial_deposit)?;
                }
                None => {
                    let (customer, _) =
                        self.bank
                            .onboard(owner.as_str(), category, profile, kind, initial_deposit)?;
                    self.customers.insert(owner, customer);
                }
            },
            Command::Execute(operation) => {
                self.bank.process(&operation)?;
            }
            Command::MonthlyFee(Some(account)) => {
                self.bank.apply_monthly_fee(&account)?;
            }
            Command::MonthlyFee(None) => {
                self.bank.apply_monthly_fees()?;
            }
        }
        Ok(())
    }
}

fn process_commands_from_filepath(filepath: &Path, policy: PolicyConfig) -> Result<Bank> {
    let file = File::open(filepath).with_context(|| format!("opening {}", filepath.display()))?;

    let mut rdr = csv::ReaderBuilder::new().trim(Trim::All).from_reader(file);

    let mut session = Session {
        bank: Bank::new(policy),
        customers: HashMap::new(),
    };

    log::debug!("Started deserialising records");
    for (line, result) in rdr.deserialize::<InputRecord>().enumerate() {
        log::debug!("Deserialising record into InputRecord: {result:?}");
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Error deserializing record:{e}");
                continue;
            }
        };

        log::debug!("Converting InputRecord into Command: {record:?}");
        let command = match record.to_command() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Skipping record {}: {e}", line + 1);
                continue;
            }
        };

        log::debug!("Applying command: {command:?}");
        if let Err(e) = session.apply(command) {
            log::warn!("Error processing record {}: {e}", line + 1);
        }
    }

    Ok(session.bank)
}

fn write_to_std_out(bank: &Bank) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());

    log::debug!("Starting account snapshot serialisation");
    for snapshot in bank.list_accounts()? {
        log::debug!("Serialising account snapshot: {snapshot:?}");
        wtr.serialize(snapshot)?;
    }

    log::debug!("Account snapshot serialisation done -> Flushing to stdout");
    wtr.flush()?;

    Ok(())
}
