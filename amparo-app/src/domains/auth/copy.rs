//! User-facing strings for the authentication screen.

pub const TITLE_ERROR: &str = "Erro";
pub const TITLE_SIGN_IN_ERROR: &str = "Erro de Login";
pub const TITLE_INCOMPLETE: &str = "Informações incompletas";
pub const TITLE_ACCOUNT_CREATED: &str = "Conta Criada!";
pub const TITLE_CHECK_INBOX: &str = "Verifique seu email";
pub const TITLE_RESET_SENT: &str = "Email Enviado";

pub const FILL_ALL_FIELDS: &str = "Por favor, preencha todos os campos";
pub const FILL_REQUIRED_FIELDS: &str =
    "Por favor, preencha todos os campos obrigatórios";
pub const ENTER_EMAIL: &str = "Por favor, digite seu email";

pub const ACCOUNT_CREATED: &str = "Sua conta foi criada com sucesso.";
pub const CONFIRM_EMAIL: &str =
    "Enviamos um link de confirmação para o seu email. Confirme o cadastro antes de entrar.";
pub const RESET_SENT: &str = "Enviamos um link para redefinir sua senha para o seu email. Por favor, verifique sua caixa de entrada.";
pub const UNKNOWN_ERROR: &str = "Ocorreu um erro desconhecido";

pub const SUBMIT_SIGN_IN: &str = "Entrar";
pub const SUBMITTING_SIGN_IN: &str = "Entrando...";
pub const SUBMIT_SIGN_UP: &str = "Criar Conta";
pub const SUBMITTING_SIGN_UP: &str = "Criando Conta...";
pub const SUBMIT_RESET: &str = "Enviar Link de Recuperação";
pub const SUBMITTING_RESET: &str = "Enviando...";
