use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
/// Error codes for the pool contract. Common errors are codes that match up with the built-in
/// contracts error reporting. Pool specific errors start at 1200.
pub enum PoolError {
    // Common Errors
    InternalError = 1,
    AlreadyInitializedError = 3,

    UnauthorizedError = 4,

    NegativeAmountError = 8,
    BalanceError = 10,
    OverflowError = 12,
    DivideByZero = 13,

    // Pool Request Errors (start at 1200)
    BadRequest = 1200,
    InvalidPoolInitArgs = 1201,
    InvalidReserveConfig = 1202,
    InvalidRateParams = 1203,
    InvalidCommodityParams = 1204,
    InvalidSeasonalProfile = 1205,
    InvalidEModeCategory = 1206,
    InvalidAmount = 1207,
    ReserveAlreadyInitialized = 1208,
    ReserveNotFound = 1209,

    // Pool State Errors
    InvalidHf = 1210,
    PoolPaused = 1211,
    ReserveInactive = 1212,
    ReserveFrozen = 1213,
    BorrowingDisabled = 1214,
    SupplyCapExceeded = 1215,
    BorrowCapExceeded = 1216,
    InsufficientLiquidity = 1217,
    NoCollateral = 1218,
    LtvExceeded = 1219,
    NoDebt = 1220,
    MaxReservesExceeded = 1221,
    NotBorrowableInEMode = 1222,

    // Oracle Errors
    StalePrice = 1230,

    // Liquidation Errors
    HealthyPosition = 1240,
    NoDebtOfSelectedType = 1241,
    NoCollateralOfSelectedType = 1242,
    CloseFactorExceeded = 1243,

    // Flash Loan Errors
    FlashLoanDisabled = 1250,
    FlashLoanReceiverFailed = 1251,
    FlashLoanRejected = 1252,
    FlashLoanNotRepaid = 1253,
    InvalidFlashLoanMode = 1254,
}
