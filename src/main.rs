use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokenshop::chain::{Call, Chain, Receipt, TransactionBuilder, TxCodec, TxStatus};
use tokenshop::identity::{Address, Keypair};
use tokenshop::ledger::TokenId;
use tokenshop::shop::ExchangeConfig;
use tokenshop::storage::ChainStore;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEPLOYER_LABEL: &str = "deployer";

#[derive(Parser)]
#[command(name = "shop", version, about = "Token exchange and collectible pool")]
struct Cli {
    /// Directory of the chain database
    #[arg(long, env = "SHOP_DATA_DIR", default_value = "./shop-data", global = true)]
    data_dir: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deploy the ledgers and the shop, signed by a fresh "deployer" account
    Init {
        /// Native units per token
        #[arg(long, default_value_t = 5)]
        ratio: u128,
        /// Tokens per collectible
        #[arg(long, default_value_t = 1)]
        price: u128,
    },
    /// Manage local accounts
    #[command(subcommand)]
    Account(AccountCommand),
    /// Allocate native currency to an account
    Fund { label: String, amount: u128 },
    /// Exchange native currency for tokens
    BuyTokens { label: String, amount: u128 },
    /// Allow the shop to burn or collect tokens
    ApproveTokens { label: String, amount: u128 },
    /// Burn tokens for native currency
    BurnTokens { label: String, amount: u128 },
    /// Pay the collectible price for a new collectible
    BuyCollectible { label: String },
    /// Allow the shop to burn a collectible
    ApproveCollectible { label: String, id: TokenId },
    /// Burn a collectible for a share of the pool
    BurnCollectible { label: String, id: TokenId },
    /// Owner withdrawal from the pool
    Withdraw { label: String, amount: u128 },
    /// Sign a call offline and print it as base64
    Sign(SignArgs),
    /// Execute a base64 transaction produced by `sign`
    Submit { encoded: String },
    /// Print shop state, or one account's balances
    Status { label: Option<String> },
}

#[derive(Subcommand)]
enum AccountCommand {
    /// Create and store a new keypair
    New {
        label: String,
        /// Native units to allocate right away
        #[arg(long)]
        fund: Option<u128>,
    },
    /// List stored accounts
    List,
}

#[derive(Args)]
struct SignArgs {
    label: String,
    /// Nonce to sign with; defaults to the account's next nonce
    #[arg(long)]
    nonce: Option<u64>,
    /// Native value to attach
    #[arg(long, default_value_t = 0)]
    value: u128,
    #[command(subcommand)]
    call: SignCall,
}

#[derive(Subcommand)]
enum SignCall {
    BuyTokens { amount: u128 },
    BurnTokens { amount: u128 },
    BuyCollectible,
    BurnCollectible { id: TokenId },
    Withdraw { amount: u128 },
    TransferTokens { to: Address, amount: u128 },
    TransferNative { to: Address },
}

impl From<SignCall> for Call {
    fn from(call: SignCall) -> Self {
        match call {
            SignCall::BuyTokens { amount } => Call::PurchaseTokens { amount },
            SignCall::BurnTokens { amount } => Call::BurnTokens { amount },
            SignCall::BuyCollectible => Call::PurchaseCollectible,
            SignCall::BurnCollectible { id } => Call::BurnCollectible { id },
            SignCall::Withdraw { amount } => Call::Withdraw { amount },
            SignCall::TransferTokens { to, amount } => Call::TransferTokens { to, amount },
            SignCall::TransferNative { to } => Call::TransferNative { to },
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let store = ChainStore::open(&cli.data_dir)?;
    debug!(data_dir = %cli.data_dir.display(), "store opened");

    match cli.command {
        Command::Init { ratio, price } => {
            if store.has_chain()? {
                return Err("chain already initialized in this data directory".into());
            }
            let deployer = Keypair::generate();
            let config = ExchangeConfig::new(ratio, price)?;
            let chain = Chain::deploy(&deployer, config)?;
            store.save_keypair(DEPLOYER_LABEL, &deployer)?;
            store.save_chain(&chain)?;
            print_shop(&chain);
        }
        Command::Account(AccountCommand::New { label, fund }) => {
            if store.load_keypair(&label)?.is_some() {
                return Err(format!("account '{label}' already exists").into());
            }
            let keypair = Keypair::generate();
            store.save_keypair(&label, &keypair)?;
            if let Some(amount) = fund {
                let mut chain = load_chain(&store)?;
                chain.fund(&keypair.address(), amount)?;
                store.save_chain(&chain)?;
            }
            println!("{label}: {}", keypair.address());
        }
        Command::Account(AccountCommand::List) => {
            for label in store.keypair_labels()? {
                if let Some(keypair) = store.load_keypair(&label)? {
                    println!("{label}: {}", keypair.address());
                }
            }
        }
        Command::Fund { label, amount } => {
            let keypair = load_keypair(&store, &label)?;
            let mut chain = load_chain(&store)?;
            chain.fund(&keypair.address(), amount)?;
            store.save_chain(&chain)?;
            println!("{label}: native {}", chain.native().balance_of(&keypair.address()));
        }
        Command::BuyTokens { label, amount } => {
            submit(&store, &label, Call::PurchaseTokens { amount }, amount)?;
        }
        Command::ApproveTokens { label, amount } => {
            let spender = *load_chain(&store)?.sale().address();
            submit(&store, &label, Call::ApproveTokens { spender, amount }, 0)?;
        }
        Command::BurnTokens { label, amount } => {
            submit(&store, &label, Call::BurnTokens { amount }, 0)?;
        }
        Command::BuyCollectible { label } => {
            submit(&store, &label, Call::PurchaseCollectible, 0)?;
        }
        Command::ApproveCollectible { label, id } => {
            let spender = *load_chain(&store)?.sale().address();
            submit(&store, &label, Call::ApproveCollectible { spender, id }, 0)?;
        }
        Command::BurnCollectible { label, id } => {
            submit(&store, &label, Call::BurnCollectible { id }, 0)?;
        }
        Command::Withdraw { label, amount } => {
            submit(&store, &label, Call::Withdraw { amount }, 0)?;
        }
        Command::Sign(args) => {
            let keypair = load_keypair(&store, &args.label)?;
            let nonce = match args.nonce {
                Some(nonce) => nonce,
                None => load_chain(&store)?.nonce_of(&keypair.address()),
            };
            let signed = TransactionBuilder::new()
                .signer(&keypair)
                .call(args.call.into())
                .nonce(nonce)
                .value(args.value)
                .build()?;
            println!("{}", TxCodec::encode_base64(&signed)?);
        }
        Command::Submit { encoded } => {
            let signed = TxCodec::decode_base64(&encoded)?;
            let mut chain = load_chain(&store)?;
            let receipt = chain.execute(&signed)?;
            store.save_chain(&chain)?;
            print_receipt(&receipt);
        }
        Command::Status { label } => {
            let chain = load_chain(&store)?;
            match label {
                Some(label) => {
                    let address = load_keypair(&store, &label)?.address();
                    print_account(&chain, &label, &address);
                }
                None => print_shop(&chain),
            }
        }
    }

    Ok(())
}

fn load_chain(store: &ChainStore) -> CliResult<Chain> {
    store
        .load_chain()?
        .ok_or_else(|| "no chain found; run `shop init` first".into())
}

fn load_keypair(store: &ChainStore, label: &str) -> CliResult<Keypair> {
    store
        .load_keypair(label)?
        .ok_or_else(|| format!("unknown account '{label}'").into())
}

fn submit(store: &ChainStore, label: &str, call: Call, value: u128) -> CliResult<()> {
    let keypair = load_keypair(store, label)?;
    let mut chain = load_chain(store)?;
    let receipt = chain.call_with_value(&keypair, call, value)?;
    store.save_chain(&chain)?;
    print_receipt(&receipt);
    Ok(())
}

fn print_receipt(receipt: &Receipt) {
    match receipt.status() {
        TxStatus::Committed(outcome) => {
            println!("{} {} committed: {:?}", receipt.tx_id(), receipt.call(), outcome);
        }
        TxStatus::Reverted { kind, reason } => {
            println!("{} {} reverted ({kind}): {reason}", receipt.tx_id(), receipt.call());
        }
    }
}

fn print_shop(chain: &Chain) {
    let sale = chain.sale();
    println!("shop:              {}", sale.address());
    println!("owner:             {}", sale.owner());
    println!("payment token:     {}", sale.payment_token_address());
    println!("collectible token: {}", sale.collectible_token_address());
    println!("ratio:             {}", sale.exchange_ratio());
    println!("collectible price: {}", sale.collectible_price());
    println!("pool balance:      {}", sale.pool_balance());
    println!("native reserve:    {}", chain.native_reserve());
    println!("token supply:      {}", chain.token().total_supply());
    println!("collectibles:      {}", chain.collectible().total_supply());
    println!("height:            {}", chain.height());
}

fn print_account(chain: &Chain, label: &str, address: &Address) {
    println!("{label}: {address}");
    println!("  native:       {}", chain.native().balance_of(address));
    println!("  tokens:       {}", chain.token().balance_of(address));
    println!(
        "  allowance:    {}",
        chain.token().allowance(address, chain.sale().address())
    );
    println!("  collectibles: {:?}", chain.collectible().tokens_of(address));
    println!("  next nonce:   {}", chain.nonce_of(address));
}
