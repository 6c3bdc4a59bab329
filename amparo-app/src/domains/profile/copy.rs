pub const TITLE_ERROR: &str = "Erro";
pub const TITLE_SUCCESS: &str = "Sucesso";
pub const TITLE_SIGN_OUT: &str = "Sair";

pub const NAME_REQUIRED: &str = "Nome e sobrenome são obrigatórios";
pub const PROFILE_UPDATED: &str = "Perfil atualizado com sucesso!";
pub const PROFILE_UPDATE_FAILED: &str = "Ocorreu um erro ao atualizar o perfil";
pub const CONFIRM_SIGN_OUT: &str = "Tem certeza que deseja sair da sua conta?";
pub const SIGN_OUT_FAILED: &str = "Não foi possível fazer logout";
