// Declaro — CLI Command Handlers
//
// Each function handles one CLI subcommand. Input is validated with the form
// rules first; the repositories are then called once and their returned view
// is printed directly.

use zeroize::Zeroizing;

use crate::app::App;
use crate::auth::ProfileUpdate;
use crate::config::AppConfig;
use crate::error::DeclaroError;
use crate::store::{
    BeneficialOwner, Declaration, DeclarationStore, PurposeOfTransaction, SourceOfFund,
    StoreError,
};
use crate::validation::{self, ValidationErrors};

use super::{Commands, CreateArgs, UpdateArgs};

/// Execute the parsed CLI command.
pub async fn execute(command: Commands, config: &AppConfig) -> Result<(), DeclaroError> {
    let app = App::open(config)?;

    match command {
        Commands::Login { username, password } => {
            cmd_login(&app, username, Zeroizing::new(password)).await
        }
        Commands::Register {
            username,
            password,
            confirm,
        } => cmd_register(&app, username, Zeroizing::new(password), Zeroizing::new(confirm)).await,
        Commands::Logout => cmd_logout(&app),
        Commands::Whoami => cmd_whoami(&app),
        Commands::Profile {
            username,
            store_name,
            store_address,
        } => cmd_profile(
            &app,
            ProfileUpdate {
                username,
                store_name,
                store_address,
            },
        ),
        Commands::Passwd {
            current,
            new,
            confirm,
        } => {
            cmd_passwd(
                &app,
                Zeroizing::new(current),
                Zeroizing::new(new),
                Zeroizing::new(confirm),
            )
            .await
        }
        Commands::Create(args) => cmd_create(&app, *args),
        Commands::List => cmd_list(&app),
        Commands::Show { id } => cmd_show(&app, id),
        Commands::Update(args) => cmd_update(&app, *args),
        Commands::Delete { id } => cmd_delete(&app, id),
    }
}

// ─── Session ─────────────────────────────────────────────────────────────────

async fn cmd_login(
    app: &App,
    username: String,
    password: Zeroizing<String>,
) -> Result<(), DeclaroError> {
    ValidationErrors::check(validation::validate_login(&username, &password))?;

    let user = app.session.login(&username, &password).await?;
    println!("✓ Logged in as {}", user.username);
    println!("  Store: {}", user.store_name);
    Ok(())
}

async fn cmd_register(
    app: &App,
    username: String,
    password: Zeroizing<String>,
    confirm: Zeroizing<String>,
) -> Result<(), DeclaroError> {
    ValidationErrors::check(validation::validate_registration(&username, &password, &confirm))?;

    let user = app.session.register(username.trim(), &password).await?;
    println!("✓ Account created");
    println!("  ID:       {}", user.id);
    println!("  Username: {}", user.username);
    println!();
    println!("Next: set your store details with `declaro profile --store-name <name> --store-address <address>`");
    Ok(())
}

fn cmd_logout(app: &App) -> Result<(), DeclaroError> {
    app.session.logout();
    println!("✓ Logged out");
    Ok(())
}

fn cmd_whoami(app: &App) -> Result<(), DeclaroError> {
    match app.session.current_user() {
        Some(user) => {
            println!("  ID:       {}", user.id);
            println!("  Username: {}", user.username);
            println!("  Store:    {}", user.store_name);
            println!("  Address:  {}", user.store_address);
        }
        None => println!("Not logged in. Run `declaro login <username> --password <password>`."),
    }
    Ok(())
}

fn cmd_profile(app: &App, update: ProfileUpdate) -> Result<(), DeclaroError> {
    let current = app
        .session
        .current_user()
        .ok_or_else(|| DeclaroError::Other("Not logged in".to_string()))?;

    if update.is_empty() {
        return Err(DeclaroError::Other(
            "Nothing to update: pass --username, --store-name or --store-address".to_string(),
        ));
    }

    let merged = update.merged(&current);
    ValidationErrors::check(validation::validate_profile(
        &merged.username,
        &merged.store_name,
        &merged.store_address,
    ))?;

    if let Some(user) = app.session.update_profile(&update)? {
        println!("✓ Profile updated");
        println!("  Username: {}", user.username);
        println!("  Store:    {}", user.store_name);
        println!("  Address:  {}", user.store_address);
    }
    Ok(())
}

async fn cmd_passwd(
    app: &App,
    current: Zeroizing<String>,
    new: Zeroizing<String>,
    confirm: Zeroizing<String>,
) -> Result<(), DeclaroError> {
    ValidationErrors::check(validation::validate_password_change(&current, &new, &confirm))?;

    app.session.change_password(&current, &new).await?;
    println!("✓ Password changed");
    Ok(())
}

// ─── Declarations ────────────────────────────────────────────────────────────

fn cmd_create(app: &App, args: CreateArgs) -> Result<(), DeclaroError> {
    let fields = args.into_fields();
    ValidationErrors::check(validation::validate_declaration(&fields))?;

    let declaration = app.declarations.create(fields)?;
    println!("✓ Declaration stored");
    println!("  ID:   {}", declaration.id);
    println!("  {}", declaration);
    Ok(())
}

fn cmd_list(app: &App) -> Result<(), DeclaroError> {
    let declarations = app.declarations.list_for_current_user()?;
    print_list(&declarations);
    Ok(())
}

fn cmd_show(app: &App, id: String) -> Result<(), DeclaroError> {
    let declaration = app.declarations.get_by_id(&id)?;
    let store = app.session.current_user();

    print_declaration(&declaration, store.as_ref().map(|u| u.store_name.as_str()));
    app.declarations.clear_current();
    Ok(())
}

fn cmd_update(app: &App, args: UpdateArgs) -> Result<(), DeclaroError> {
    let (id, patch) = args.into_patch();
    if patch.is_empty() {
        return Err(DeclaroError::Other("Nothing to update".to_string()));
    }

    // Validate the record as it would look after the overwrite.
    let mut preview = app
        .declarations
        .all()
        .into_iter()
        .find(|d| d.id == id)
        .map(|d| d.fields)
        .ok_or_else(|| StoreError::NotFound(id.clone()))?;
    patch.apply_to(&mut preview);
    ValidationErrors::check(validation::validate_declaration(&preview))?;

    if let Some(updated) = app.declarations.update(&id, &patch)? {
        println!("✓ Declaration updated");
        println!("  {}", updated);
    }
    Ok(())
}

fn cmd_delete(app: &App, id: String) -> Result<(), DeclaroError> {
    let before = app.declarations.all().len();
    let remaining = app.declarations.delete(&id)?;

    if app.declarations.all().len() < before {
        println!("✓ Declaration {} deleted", id);
    } else {
        println!("Declaration not found: {}", id);
    }
    println!();
    print_list(&remaining);
    Ok(())
}

// ─── Output ──────────────────────────────────────────────────────────────────

fn print_list(declarations: &[Declaration]) {
    if declarations.is_empty() {
        println!("No declarations yet.");
        println!("Record one with: declaro create --transaction-no <no> --name <name> ...");
        return;
    }

    println!("Declarations ({}):\n", declarations.len());
    for d in declarations {
        println!(
            "  {} │ {:12} │ {:20} │ {}",
            d.id,
            d.fields.transaction_no,
            d.fields.name,
            d.created_at.format("%Y-%m-%d"),
        );
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn print_declaration(d: &Declaration, store_name: Option<&str>) {
    let f = &d.fields;

    if let Some(store) = store_name {
        println!("{}", store);
    }
    println!("{}\n", d);

    println!("TRANSACTION VOLUME");
    println!("  {}\n", f.transaction_volume.label());

    println!("TRANSACTION REPORT");
    println!("  Transaction No   : {}", f.transaction_no);
    println!("  Transaction Date : {}", f.transaction_date);
    println!("  ID No            : {}", f.id_no);
    println!("  Name             : {}", f.name);
    println!("  Nationality      : {}", f.nationality);
    println!("  Address          : {}", f.address);
    println!("  Date of Birth    : {}", f.dob);
    println!("  Phone No         : {}\n", f.phone_no);

    println!("SOURCE OF FUND");
    match f.source_of_fund_others {
        Some(ref other) if f.source_of_fund == SourceOfFund::Others => {
            println!("  {}: {}\n", f.source_of_fund.label(), other)
        }
        _ => println!("  {}\n", f.source_of_fund.label()),
    }

    println!("PURPOSE OF TRANSACTION");
    match f.purpose_of_transaction_others {
        Some(ref other) if f.purpose_of_transaction == PurposeOfTransaction::Others => {
            println!("  {}: {}\n", f.purpose_of_transaction.label(), other)
        }
        _ => println!("  {}\n", f.purpose_of_transaction.label()),
    }

    println!("BENEFICIAL OWNER");
    match f.beneficial_owner_share {
        Some(ref share) if f.beneficial_owner == BeneficialOwner::Shares => {
            println!("  {}", f.beneficial_owner.label());
            println!("  Share: {}%\n", share)
        }
        _ => println!("  {}\n", f.beneficial_owner.label()),
    }

    println!("COMPLIANCE");
    println!("  Cross-border movement : {}", yes_no(f.cross_border_movement));
    println!("  Sanctions (MAS)       : {}", yes_no(f.compliance_mas));
    println!("  PEP                   : {}", yes_no(f.compliance_pep));
    println!("  Tax evasion           : {}\n", yes_no(f.compliance_tax_evasion));

    println!("  Created: {}", d.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

// ─── Tests ───────────────────────────────────────────────────────────────────
