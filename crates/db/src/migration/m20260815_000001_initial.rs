//! Initial database migration.
//!
//! Creates the ledger schema: enums, boarding houses, chart of accounts,
//! transactions, journal entries, cached balances, period cache, and
//! reconciliation tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(BOARDING_HOUSES_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(ACCOUNT_BALANCES_SQL).await?;
        db.execute_unprepared(ACCOUNT_PERIODS_SQL).await?;
        db.execute_unprepared(RECONCILIATION_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

CREATE TYPE entry_type AS ENUM ('debit', 'credit');

CREATE TYPE transaction_status AS ENUM ('draft', 'posted');

CREATE TYPE transaction_category AS ENUM (
    'manual',
    'expense',
    'payment',
    'transfer',
    'overdue_rent',
    'petty_cash',
    'opening_balance',
    'reversal'
);

CREATE TYPE reconciliation_status AS ENUM (
    'pending',
    'reconciled',
    'unreconciled'
);

CREATE TYPE item_source AS ENUM ('book', 'bank');
";

const BOARDING_HOUSES_SQL: &str = r"
CREATE TABLE boarding_houses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    address TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    boarding_house_id UUID NOT NULL REFERENCES boarding_houses(id) ON DELETE CASCADE,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    is_category BOOLEAN NOT NULL DEFAULT false,
    is_cash_account BOOLEAN NOT NULL DEFAULT false,
    parent_id UUID REFERENCES accounts(id),
    deleted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX idx_accounts_code ON accounts(boarding_house_id, code) WHERE deleted_at IS NULL;
CREATE INDEX idx_accounts_bh ON accounts(boarding_house_id) WHERE deleted_at IS NULL;
CREATE INDEX idx_accounts_parent ON accounts(parent_id) WHERE parent_id IS NOT NULL;
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    boarding_house_id UUID NOT NULL REFERENCES boarding_houses(id) ON DELETE CASCADE,
    transaction_date DATE NOT NULL,
    reference_number VARCHAR(100),
    description TEXT NOT NULL,
    category transaction_category NOT NULL,
    status transaction_status NOT NULL DEFAULT 'draft',
    reverses_transaction_id UUID REFERENCES transactions(id),
    deleted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_txn_bh_date ON transactions(boarding_house_id, transaction_date);
CREATE INDEX idx_txn_bh_status ON transactions(boarding_house_id, status);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    transaction_id UUID NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    entry_type entry_type NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    description VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_je_transaction ON journal_entries(transaction_id);
CREATE INDEX idx_je_account ON journal_entries(account_id);
";

const ACCOUNT_BALANCES_SQL: &str = r"
CREATE TABLE account_balances (
    account_id UUID PRIMARY KEY REFERENCES accounts(id) ON DELETE CASCADE,
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    version BIGINT NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNT_PERIODS_SQL: &str = r"
CREATE TABLE account_periods (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    boarding_house_id UUID NOT NULL REFERENCES boarding_houses(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    period_start DATE NOT NULL,
    period_end DATE NOT NULL,
    balance_brought_down NUMERIC(19, 4) NOT NULL,
    balance_carried_down NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_period_order CHECK (period_start <= period_end),
    UNIQUE (account_id, period_start, period_end)
);

CREATE INDEX idx_periods_account ON account_periods(account_id, period_start);
";

const RECONCILIATION_SQL: &str = r"
CREATE TABLE reconciliation_sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    boarding_house_id UUID NOT NULL REFERENCES boarding_houses(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    reconciliation_date DATE NOT NULL,
    book_balance NUMERIC(19, 4) NOT NULL,
    bank_balance NUMERIC(19, 4) NOT NULL,
    status reconciliation_status NOT NULL DEFAULT 'pending',
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_recon_bh ON reconciliation_sessions(boarding_house_id);
CREATE INDEX idx_recon_account ON reconciliation_sessions(account_id);

CREATE TABLE reconciliation_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reconciliation_id UUID NOT NULL REFERENCES reconciliation_sessions(id) ON DELETE CASCADE,
    source item_source NOT NULL,
    journal_entry_id UUID REFERENCES journal_entries(id),
    item_date DATE NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    entry_type entry_type NOT NULL,
    reference VARCHAR(100),
    is_reconciled BOOLEAN NOT NULL DEFAULT false,
    matched_counterpart_id UUID REFERENCES reconciliation_items(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_item_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_recon_items_session ON reconciliation_items(reconciliation_id, source);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS reconciliation_items CASCADE;
DROP TABLE IF EXISTS reconciliation_sessions CASCADE;
DROP TABLE IF EXISTS account_periods CASCADE;
DROP TABLE IF EXISTS account_balances CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS boarding_houses CASCADE;
DROP TYPE IF EXISTS item_source;
DROP TYPE IF EXISTS reconciliation_status;
DROP TYPE IF EXISTS transaction_category;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS entry_type;
DROP TYPE IF EXISTS account_type;
";
