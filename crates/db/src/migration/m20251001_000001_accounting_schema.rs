//! Accounting schema.
//!
//! Creates enums, the collaborator tables the ledger reads (operations,
//! payments, commission records) and the accounting tables it owns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: COLLABORATOR TABLES
        // ============================================================
        db.execute_unprepared(OPERATIONS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(COMMISSION_RECORDS_SQL).await?;

        // ============================================================
        // PART 3: EXCHANGE RATES
        // ============================================================
        db.execute_unprepared(EXCHANGE_RATES_SQL).await?;

        // ============================================================
        // PART 4: ACCOUNTS & LEDGER
        // ============================================================
        db.execute_unprepared(CHART_OF_ACCOUNTS_SQL).await?;
        db.execute_unprepared(FINANCIAL_ACCOUNTS_SQL).await?;
        db.execute_unprepared(LEDGER_MOVEMENTS_SQL).await?;

        // ============================================================
        // PART 5: VAT
        // ============================================================
        db.execute_unprepared(IVA_SQL).await?;

        // ============================================================
        // PART 6: OPERATOR PAYMENTS
        // ============================================================
        db.execute_unprepared(OPERATOR_PAYMENTS_SQL).await?;

        // ============================================================
        // PART 7: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_CHART_SQL).await?;

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
CREATE TYPE currency_code AS ENUM ('ARS', 'USD');

CREATE TYPE movement_type AS ENUM (
    'INCOME',
    'EXPENSE',
    'FX_GAIN',
    'FX_LOSS',
    'COMMISSION',
    'OPERATOR_PAYMENT'
);

CREATE TYPE payment_method AS ENUM ('CASH', 'BANK', 'MP', 'USD', 'OTHER');

CREATE TYPE financial_account_type AS ENUM (
    'CASH_ARS',
    'CASH_USD',
    'CHECKING_ARS',
    'CHECKING_USD',
    'SAVINGS_ARS',
    'SAVINGS_USD',
    'CREDIT_CARD',
    'MERCADO_PAGO',
    'RECEIVABLES',
    'PAYABLES'
);

CREATE TYPE account_category AS ENUM (
    'ASSET',
    'LIABILITY',
    'EQUITY',
    'INCOME',
    'COSTS',
    'EXPENSES'
);

CREATE TYPE rate_source AS ENUM ('MANUAL', 'API');

CREATE TYPE operator_payment_status AS ENUM ('PENDING', 'PAID', 'OVERDUE');

CREATE TYPE product_type AS ENUM (
    'AIR',
    'HOTEL',
    'PACKAGE',
    'CRUISE',
    'TRANSFER',
    'ASSISTANCE',
    'OTHER'
);

CREATE TYPE payer_type AS ENUM ('CUSTOMER', 'OPERATOR');

CREATE TYPE payment_direction AS ENUM ('INCOME', 'EXPENSE');

CREATE TYPE settlement_status AS ENUM ('PENDING', 'PAID');
";

const OPERATIONS_SQL: &str = r"
CREATE TABLE operations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    file_code VARCHAR(50),
    seller_id UUID,
    operator_id UUID,
    product_type product_type,
    sale_amount_total NUMERIC(18, 2),
    sale_currency currency_code,
    operator_cost NUMERIC(18, 2),
    operator_cost_currency currency_code,
    purchase_date DATE,
    checkin_date DATE,
    departure_date DATE,
    lead_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_operations_lead ON operations(lead_id) WHERE lead_id IS NOT NULL;
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_id UUID NOT NULL REFERENCES operations(id) ON DELETE CASCADE,
    payer_type payer_type NOT NULL,
    direction payment_direction NOT NULL,
    method payment_method NOT NULL DEFAULT 'CASH',
    amount NUMERIC(18, 2) NOT NULL,
    currency currency_code NOT NULL,
    exchange_rate NUMERIC(18, 4),
    status settlement_status NOT NULL DEFAULT 'PENDING',
    date_due DATE,
    date_paid DATE,
    ledger_movement_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_payment_amount CHECK (amount >= 0)
);

CREATE INDEX idx_payments_operation ON payments(operation_id, status);
";

const COMMISSION_RECORDS_SQL: &str = r"
CREATE TABLE commission_records (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_id UUID NOT NULL REFERENCES operations(id) ON DELETE CASCADE,
    seller_id UUID,
    amount NUMERIC(18, 2) NOT NULL,
    currency currency_code NOT NULL DEFAULT 'ARS',
    status settlement_status NOT NULL DEFAULT 'PENDING',
    date_paid DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_commissions_operation ON commission_records(operation_id) WHERE status = 'PENDING';
";

const EXCHANGE_RATES_SQL: &str = r"
CREATE TABLE exchange_rates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    rate_date DATE NOT NULL,
    from_currency currency_code NOT NULL DEFAULT 'USD',
    to_currency currency_code NOT NULL DEFAULT 'ARS',
    rate NUMERIC(18, 4) NOT NULL,
    source rate_source NOT NULL DEFAULT 'MANUAL',
    notes TEXT,
    created_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_rate_positive CHECK (rate > 0),
    CONSTRAINT chk_different_currencies CHECK (from_currency <> to_currency),
    UNIQUE (rate_date, from_currency, to_currency)
);

CREATE INDEX idx_exchange_rates_lookup ON exchange_rates(from_currency, to_currency, rate_date DESC);
";

const CHART_OF_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_of_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    category account_category NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const FINANCIAL_ACCOUNTS_SQL: &str = r"
CREATE TABLE financial_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    account_type financial_account_type NOT NULL,
    currency currency_code NOT NULL,
    initial_balance NUMERIC(18, 2) NOT NULL DEFAULT 0,
    current_balance NUMERIC(18, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    chart_account_id UUID REFERENCES chart_of_accounts(id),
    created_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_financial_accounts_archetype ON financial_accounts(account_type, currency) WHERE is_active = true;
";

const LEDGER_MOVEMENTS_SQL: &str = r"
CREATE TABLE ledger_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_id UUID REFERENCES operations(id) ON DELETE SET NULL,
    lead_id UUID,
    type movement_type NOT NULL,
    concept VARCHAR(500) NOT NULL,
    currency currency_code NOT NULL,
    amount_original NUMERIC(18, 2) NOT NULL,
    exchange_rate NUMERIC(18, 4),
    amount_ars_equivalent NUMERIC(18, 2) NOT NULL,
    method payment_method NOT NULL,
    account_id UUID NOT NULL REFERENCES financial_accounts(id),
    seller_id UUID,
    operator_id UUID,
    receipt_number VARCHAR(100),
    notes TEXT,
    idempotency_key VARCHAR(255),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amounts_non_negative CHECK (amount_original >= 0 AND amount_ars_equivalent >= 0),
    CONSTRAINT chk_usd_has_rate CHECK (currency <> 'USD' OR (exchange_rate IS NOT NULL AND exchange_rate > 0))
);

CREATE INDEX idx_movements_operation ON ledger_movements(operation_id, type, created_at DESC);
CREATE INDEX idx_movements_account ON ledger_movements(account_id);
CREATE INDEX idx_movements_lead ON ledger_movements(lead_id) WHERE lead_id IS NOT NULL;
CREATE UNIQUE INDEX idx_movements_idempotency ON ledger_movements(operation_id, type, idempotency_key)
    WHERE idempotency_key IS NOT NULL;

-- Movements are append-only facts
CREATE OR REPLACE FUNCTION prevent_movement_amount_change()
RETURNS TRIGGER AS $$
BEGIN
    IF NEW.amount_original <> OLD.amount_original
        OR NEW.amount_ars_equivalent <> OLD.amount_ars_equivalent
        OR NEW.type <> OLD.type
        OR NEW.currency <> OLD.currency THEN
        RAISE EXCEPTION 'Ledger movements are immutable';
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_movement_amount_change
BEFORE UPDATE ON ledger_movements
FOR EACH ROW EXECUTE FUNCTION prevent_movement_amount_change();
";

const IVA_SQL: &str = r"
CREATE TABLE iva_sales (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_id UUID NOT NULL UNIQUE REFERENCES operations(id) ON DELETE CASCADE,
    sale_amount_total NUMERIC(18, 2) NOT NULL,
    net_amount NUMERIC(18, 2) NOT NULL,
    iva_amount NUMERIC(18, 2) NOT NULL,
    currency currency_code NOT NULL,
    sale_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_iva_sales_date ON iva_sales(sale_date);

CREATE TABLE iva_purchases (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_id UUID NOT NULL UNIQUE REFERENCES operations(id) ON DELETE CASCADE,
    operator_id UUID,
    operator_cost_total NUMERIC(18, 2) NOT NULL,
    net_amount NUMERIC(18, 2) NOT NULL,
    iva_amount NUMERIC(18, 2) NOT NULL,
    currency currency_code NOT NULL,
    purchase_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_iva_purchases_date ON iva_purchases(purchase_date);
";

const OPERATOR_PAYMENTS_SQL: &str = r"
CREATE TABLE operator_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_id UUID NOT NULL REFERENCES operations(id) ON DELETE CASCADE,
    operator_id UUID NOT NULL,
    amount NUMERIC(18, 2) NOT NULL,
    currency currency_code NOT NULL,
    due_date DATE NOT NULL,
    status operator_payment_status NOT NULL DEFAULT 'PENDING',
    paid_amount NUMERIC(18, 2) NOT NULL DEFAULT 0,
    ledger_movement_id UUID REFERENCES ledger_movements(id),
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_operator_payment_amount CHECK (amount > 0)
);

CREATE INDEX idx_operator_payments_due ON operator_payments(status, due_date);
CREATE INDEX idx_operator_payments_operation ON operator_payments(operation_id);
";

const SEED_CHART_SQL: &str = r"
INSERT INTO chart_of_accounts (code, name, category) VALUES
    ('1.1.01', 'Caja', 'ASSET'),
    ('1.1.02', 'Bancos', 'ASSET'),
    ('1.1.03', 'Cuentas por cobrar', 'ASSET'),
    ('2.1.01', 'Cuentas por pagar a operadores', 'LIABILITY'),
    ('2.1.02', 'Tarjetas de crédito', 'LIABILITY'),
    ('4.1.01', 'Ventas de viajes', 'INCOME'),
    ('4.2.01', 'Diferencia de cambio', 'INCOME'),
    ('5.1.01', 'Costo de operadores', 'COSTS'),
    ('6.1.01', 'Comisiones', 'EXPENSES');
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_prevent_movement_amount_change ON ledger_movements;
DROP FUNCTION IF EXISTS prevent_movement_amount_change();

DROP TABLE IF EXISTS operator_payments CASCADE;
DROP TABLE IF EXISTS iva_purchases CASCADE;
DROP TABLE IF EXISTS iva_sales CASCADE;
DROP TABLE IF EXISTS ledger_movements CASCADE;
DROP TABLE IF EXISTS financial_accounts CASCADE;
DROP TABLE IF EXISTS chart_of_accounts CASCADE;
DROP TABLE IF EXISTS exchange_rates CASCADE;
DROP TABLE IF EXISTS commission_records CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS operations CASCADE;

DROP TYPE IF EXISTS settlement_status CASCADE;
DROP TYPE IF EXISTS payment_direction CASCADE;
DROP TYPE IF EXISTS payer_type CASCADE;
DROP TYPE IF EXISTS product_type CASCADE;
DROP TYPE IF EXISTS operator_payment_status CASCADE;
DROP TYPE IF EXISTS rate_source CASCADE;
DROP TYPE IF EXISTS account_category CASCADE;
DROP TYPE IF EXISTS financial_account_type CASCADE;
DROP TYPE IF EXISTS payment_method CASCADE;
DROP TYPE IF EXISTS movement_type CASCADE;
DROP TYPE IF EXISTS currency_code CASCADE;
";
