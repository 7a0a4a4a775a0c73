// src/usuarios/mod.rs

// Structs de usuários (compradores) e claims de autenticação
pub mod usuario_structs;
// Rotas de usuários: CRUD, login e recuperação de senha
pub mod usuario_router;
// Extrator de autenticação JWT (Bearer) e guarda de nível
pub mod auth_middleware;
