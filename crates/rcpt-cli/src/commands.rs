use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::{json, Value};

use rcpt_api::{
    endpoints, AssociateTokenRequest, BalanceResponse, HealthResponse, LogsResponse,
    MintReceiptRequest, MintReceiptResponse, OperationResponse, TransferReceiptRequest,
};
use rcpt_audit::{AuditOperation, AuditRecord};
use rcpt_crypto::SigningKey;
use rcpt_server::{FileConfig, ReceiptServer, ServerConfig};

use crate::cli::*;
use crate::client::ReceiptClient;

pub async fn run_command(cli: Cli) -> Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Keygen => cmd_keygen(format),
        Command::Mint(args) => cmd_mint(args, format).await,
        Command::Transfer(args) => cmd_transfer(args, format).await,
        Command::Associate(args) => cmd_associate(args, format).await,
        Command::Balance(args) => cmd_balance(args, format).await,
        Command::Logs(args) => cmd_logs(args, format).await,
        Command::Health(args) => cmd_health(args, format).await,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_serve(args: ServeArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let mut config = ServerConfig::from_env(file)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        config.bind_addr.set_port(port);
    }
    config.sandbox.accounts.extend(args.sandbox_accounts);

    println!(
        "{} Receipt server on {} (operator {}, sandbox ledger)",
        "▶".green().bold(),
        format!("http://{}", config.bind_addr).bold(),
        config.operator_id().cyan()
    );
    ReceiptServer::sandbox(config)?.serve().await?;
    Ok(())
}

fn cmd_keygen(format: OutputFormat) -> Result<()> {
    let key = SigningKey::generate();
    let private_key = key.to_der_hex();
    let public_key = key.verifying_key().to_der_hex();
    match format {
        OutputFormat::Json => print_json(&json!({
            "privateKey": private_key,
            "publicKey": public_key,
        })),
        OutputFormat::Text => {
            println!("{} Generated Ed25519 key", "✓".green().bold());
            println!("  Private key: {}", private_key.yellow());
            println!("  Public key:  {}", public_key);
            println!("\nSet {} to the private key before `receipts serve`.", "HEDERA_PRIVATE_KEY".bold());
            println!(
                "{}",
                "Operator keys must be Ed25519; ECDSA secp256k1 keys are refused.".dimmed()
            );
            Ok(())
        }
    }
}

async fn cmd_mint(args: MintArgs, format: OutputFormat) -> Result<()> {
    let client = ReceiptClient::new(&args.server.server);
    let request = MintReceiptRequest {
        recipient_id: Some(args.recipient),
        action_type: Some(args.action_type),
        metadata: args.metadata.map(Value::String),
    };
    let response: MintReceiptResponse = client.post(endpoints::MINT_RECEIPT, &request).await?;
    match format {
        OutputFormat::Json => print_json(&response),
        OutputFormat::Text => {
            println!("{} {}", "✓".green().bold(), response.message);
            println!("  Token: {}", response.token_id.as_str().yellow().bold());
            print_record(&response.transaction);
            Ok(())
        }
    }
}

async fn cmd_transfer(args: TransferArgs, format: OutputFormat) -> Result<()> {
    let client = ReceiptClient::new(&args.server.server);
    let request = TransferReceiptRequest {
        token_id: Some(args.token),
        to_account_id: Some(args.to),
        amount: Some(Value::from(args.amount)),
    };
    let response: OperationResponse = client.post(endpoints::TRANSFER_RECEIPT, &request).await?;
    print_operation(&response, format)
}

async fn cmd_associate(args: AssociateArgs, format: OutputFormat) -> Result<()> {
    let client = ReceiptClient::new(&args.server.server);
    let request = AssociateTokenRequest {
        token_id: Some(args.token),
        account_id: Some(args.account),
    };
    let response: OperationResponse = client.post(endpoints::ASSOCIATE_TOKEN, &request).await?;
    print_operation(&response, format)
}

fn print_operation(response: &OperationResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(response),
        OutputFormat::Text => {
            println!("{} {}", "✓".green().bold(), response.message);
            print_record(&response.transaction);
            Ok(())
        }
    }
}

async fn cmd_balance(args: BalanceArgs, format: OutputFormat) -> Result<()> {
    let client = ReceiptClient::new(&args.server.server);
    let response: BalanceResponse = client.get(&endpoints::balance(&args.account)).await?;
    match format {
        OutputFormat::Json => print_json(&response),
        OutputFormat::Text => {
            println!("Account {}", response.account_id.bold());
            println!("  hbar: {}", response.hbar_balance);
            if response.tokens.is_empty() {
                println!("  tokens: {}", "none".dimmed());
            } else {
                println!("  tokens:");
                for (token, amount) in &response.tokens {
                    println!("    {}  {}", token.yellow(), amount);
                }
            }
            Ok(())
        }
    }
}

async fn cmd_logs(args: ServerArgs, format: OutputFormat) -> Result<()> {
    let client = ReceiptClient::new(&args.server);
    let response: LogsResponse = client.get(endpoints::LOGS).await?;
    match format {
        OutputFormat::Json => print_json(&response),
        OutputFormat::Text => {
            if response.logs.is_empty() {
                println!("Audit log is empty.");
                return Ok(());
            }
            println!("{} records", response.count.to_string().bold());
            for record in &response.logs {
                println!();
                print_record(record);
            }
            Ok(())
        }
    }
}

async fn cmd_health(args: ServerArgs, format: OutputFormat) -> Result<()> {
    let client = ReceiptClient::new(&args.server);
    let response: HealthResponse = client.get(endpoints::HEALTH).await?;
    match format {
        OutputFormat::Json => print_json(&response),
        OutputFormat::Text => {
            println!(
                "{} {} {} (operator {})",
                "✓".green().bold(),
                response.status.green(),
                response.message,
                response.operator_id.cyan()
            );
            Ok(())
        }
    }
}

fn print_record(record: &AuditRecord) {
    println!(
        "  {} {}  {}",
        record.operation_type().to_string().cyan(),
        record.timestamp.to_rfc3339().dimmed(),
        record.transaction_id.as_str().dimmed()
    );
    match &record.operation {
        AuditOperation::MintReceipt {
            action_type,
            token_id,
            recipient,
            metadata,
        } => {
            println!("    Action:    {action_type}");
            println!("    Token:     {}", token_id.as_str().yellow());
            println!("    Recipient: {recipient}");
            if let Some(metadata) = metadata {
                println!("    Metadata:  {metadata}");
            }
        }
        AuditOperation::TransferReceipt {
            token_id,
            from_account,
            to_account,
            amount,
        } => {
            println!("    Token:     {}", token_id.as_str().yellow());
            println!("    {from_account} → {to_account}: {amount}");
        }
        AuditOperation::AssociateToken {
            token_id,
            account_id,
        } => {
            println!("    Token:     {}", token_id.as_str().yellow());
            println!("    Account:   {account_id}");
        }
    }
}
